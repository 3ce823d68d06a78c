//! Cart service
//!
//! The cart is owned by an external service. The engine reads snapshots from
//! it and forwards mutation requests; retries, timeouts and transport are the
//! service's business.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{cart::Cart, commands::CartMutationRequest};

pub mod memory;

pub use memory::{CartCatalog, CouponDiscount, InMemoryCartService, VariantSpec};

/// Failures reported by the cart service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartServiceError {
    /// The coupon code was not accepted.
    #[error("coupon code {0} is not valid")]
    InvalidCoupon(String),

    /// The service could not be reached.
    #[error("cart service unavailable: {0}")]
    NetworkFailure(String),

    /// The service refused the mutation.
    #[error("cart update rejected: {0}")]
    ValidationFailure(String),
}

/// Remote owner of the cart.
#[automock]
#[async_trait]
pub trait CartService: Send + Sync {
    /// Read the current cart snapshot.
    async fn get_cart_snapshot(&self) -> Result<Cart, CartServiceError>;

    /// Apply a mutation and return the resulting snapshot.
    async fn submit_mutation(&self, request: CartMutationRequest)
    -> Result<Cart, CartServiceError>;
}
