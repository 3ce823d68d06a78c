//! Cart commands
//!
//! Translates customer intents into mutation requests for the cart service,
//! enforcing the line item rules before anything leaves the engine.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cart::Cart,
    classification::ProductClassifier,
    products::{LineItemUuid, VariantId},
    review::ReviewOptions,
    rules::{
        DeletionVetoes, VariantLock, deletion_vetoes, has_marketplace_product,
        variant_selector_lock,
    },
};

/// A customer intent against the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Remove a product line.
    RemoveProduct(LineItemUuid),

    /// Apply a coupon code.
    ApplyCoupon(String),

    /// Remove the applied coupon.
    RemoveCoupon,

    /// Switch a product line to another plan-length variant.
    ChangeVariant(LineItemUuid, VariantId),
}

impl CartCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemoveProduct(_) => "remove_product",
            Self::ApplyCoupon(_) => "apply_coupon",
            Self::RemoveCoupon => "remove_coupon",
            Self::ChangeVariant(..) => "change_variant",
        }
    }
}

/// Mutation forwarded to the cart service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartMutation {
    /// Remove a product line.
    RemoveProduct {
        /// Line to remove
        uuid: LineItemUuid,
    },

    /// Apply a coupon code.
    ApplyCoupon {
        /// Normalised coupon code
        code: String,
    },

    /// Remove the applied coupon.
    RemoveCoupon,

    /// Switch a product line to another variant.
    ChangeVariant {
        /// Line to change
        uuid: LineItemUuid,

        /// Variant to switch to
        variant: VariantId,
    },
}

/// A single idempotent mutation request.
///
/// The cart service deduplicates on `request_id`, so resending the same
/// request never applies the mutation twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartMutationRequest {
    /// Idempotency key
    pub request_id: Uuid,

    /// The mutation itself
    pub mutation: CartMutation,
}

impl CartMutationRequest {
    /// Wrap a mutation with a fresh idempotency key.
    pub fn new(mutation: CartMutation) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            mutation,
        }
    }
}

/// Commands rejected before reaching the cart service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The product line is locked by one or more rules.
    #[error("product {uuid} cannot be removed from the cart")]
    NotDeletable {
        /// Locked line
        uuid: LineItemUuid,

        /// Rules that locked it
        vetoes: DeletionVetoes,
    },

    /// The product line does not offer variant changes.
    #[error("product {uuid} does not allow variant changes")]
    VariantLocked {
        /// Locked line
        uuid: LineItemUuid,

        /// Why the variant is fixed
        lock: VariantLock,
    },

    /// No product line with this uuid exists in the current snapshot.
    #[error("product {0} is not in the cart")]
    UnknownProduct(LineItemUuid),

    /// The coupon code was blank.
    #[error("coupon code is empty")]
    EmptyCouponCode,
}

/// Validate a command against the current snapshot and build its mutation request.
///
/// # Errors
///
/// Returns a [`CommandError`] when the command targets an unknown or locked
/// product line, or carries a blank coupon code.
pub fn apply_command(
    command: &CartCommand,
    cart: &Cart,
    classifier: &impl ProductClassifier,
    options: ReviewOptions,
) -> Result<CartMutationRequest, CommandError> {
    let mutation = match command {
        CartCommand::RemoveProduct(uuid) => {
            let product = cart
                .product(uuid)
                .ok_or_else(|| CommandError::UnknownProduct(uuid.clone()))?;

            let has_marketplace = has_marketplace_product(cart, classifier);
            let vetoes = deletion_vetoes(product, cart, has_marketplace, classifier);

            if !vetoes.is_empty() {
                return Err(CommandError::NotDeletable {
                    uuid: uuid.clone(),
                    vetoes,
                });
            }

            CartMutation::RemoveProduct { uuid: uuid.clone() }
        }
        CartCommand::ApplyCoupon(code) => {
            let code = code.trim();

            if code.is_empty() {
                return Err(CommandError::EmptyCouponCode);
            }

            CartMutation::ApplyCoupon {
                code: code.to_string(),
            }
        }
        CartCommand::RemoveCoupon => CartMutation::RemoveCoupon,
        CartCommand::ChangeVariant(uuid, variant) => {
            let product = cart
                .product(uuid)
                .ok_or_else(|| CommandError::UnknownProduct(uuid.clone()))?;

            if let Some(lock) =
                variant_selector_lock(product, cart, options.variant_changes_enabled, classifier)
            {
                return Err(CommandError::VariantLocked {
                    uuid: uuid.clone(),
                    lock,
                });
            }

            CartMutation::ChangeVariant {
                uuid: uuid.clone(),
                variant: variant.clone(),
            }
        }
    };

    Ok(CartMutationRequest::new(mutation))
}
