//! In-memory cart service.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    cart::{AppliedCoupon, Cart, CartTotals},
    commands::{CartMutation, CartMutationRequest},
    products::{CartProduct, VariantId},
    service::{CartService, CartServiceError},
};

/// A plan-length variant a product line can switch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    /// Slug of the variant product.
    pub product_slug: String,

    /// Display name of the variant product.
    pub product_name: String,

    /// Price in minor units.
    pub price: i64,
}

/// Discount a coupon grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponDiscount {
    /// Fixed amount off the subtotal, in minor units.
    AmountOff(i64),

    /// Whole-number percentage off the subtotal.
    PercentOff(u8),
}

impl CouponDiscount {
    fn savings(self, subtotal: i64) -> i64 {
        match self {
            Self::AmountOff(amount) => amount.min(subtotal).max(0),
            Self::PercentOff(percent) => subtotal * i64::from(percent.min(100)) / 100,
        }
    }
}

/// Variants and coupons known to the service.
#[derive(Debug, Clone, Default)]
pub struct CartCatalog {
    /// Variants by id.
    pub variants: FxHashMap<VariantId, VariantSpec>,

    /// Coupon discounts by upper-case code.
    pub coupons: FxHashMap<String, CouponDiscount>,
}

#[derive(Debug)]
struct CartState {
    products: Vec<CartProduct>,
    coupon_code: Option<String>,
    available_credits: i64,
    completed: FxHashMap<Uuid, Cart>,
}

/// Cart service that keeps a single cart in memory.
///
/// Replaying a request id returns the snapshot produced the first time.
#[derive(Debug)]
pub struct InMemoryCartService {
    state: Mutex<CartState>,
    catalog: CartCatalog,
    currency: &'static Currency,
}

impl InMemoryCartService {
    /// Create a service holding the given products and available credits.
    pub fn new(
        products: Vec<CartProduct>,
        available_credits: i64,
        catalog: CartCatalog,
        currency: &'static Currency,
    ) -> Self {
        Self {
            state: Mutex::new(CartState {
                products,
                coupon_code: None,
                available_credits,
                completed: FxHashMap::default(),
            }),
            catalog,
            currency,
        }
    }

    /// Start with a coupon already applied.
    #[must_use]
    pub fn with_coupon(self, code: impl Into<String>) -> Self {
        let mut state = self.state.into_inner();
        state.coupon_code = Some(code.into().to_uppercase());

        Self {
            state: Mutex::new(state),
            ..self
        }
    }

    fn snapshot(&self, state: &CartState) -> Result<Cart, CartServiceError> {
        let subtotal = state
            .products
            .iter()
            .map(|product| product.price().to_minor_units())
            .sum::<i64>();

        let coupon = state
            .coupon_code
            .as_ref()
            .and_then(|code| {
                self.catalog
                    .coupons
                    .get(code)
                    .map(|discount| (code, discount.savings(subtotal)))
            })
            .map(|(code, savings)| AppliedCoupon {
                code: code.clone(),
                savings,
            });

        let after_coupon = subtotal - coupon.as_ref().map_or(0, |coupon| coupon.savings);
        let credits = state.available_credits.min(after_coupon).max(0);

        let totals = CartTotals {
            subtotal,
            credits,
            total: after_coupon - credits,
        };

        Cart::with_products(state.products.clone(), coupon, totals, self.currency)
            .map_err(|error| CartServiceError::ValidationFailure(error.to_string()))
    }

    fn apply(&self, state: &mut CartState, mutation: CartMutation) -> Result<(), CartServiceError> {
        match mutation {
            CartMutation::RemoveProduct { uuid } => {
                let position = state
                    .products
                    .iter()
                    .position(|product| product.uuid() == &uuid)
                    .ok_or_else(|| {
                        CartServiceError::ValidationFailure(format!(
                            "product {uuid} is not in the cart"
                        ))
                    })?;

                state.products.remove(position);
            }
            CartMutation::ApplyCoupon { code } => {
                let code = code.to_uppercase();

                if !self.catalog.coupons.contains_key(&code) {
                    return Err(CartServiceError::InvalidCoupon(code));
                }

                state.coupon_code = Some(code);
            }
            CartMutation::RemoveCoupon => state.coupon_code = None,
            CartMutation::ChangeVariant { uuid, variant } => {
                let spec = self.catalog.variants.get(&variant).ok_or_else(|| {
                    CartServiceError::ValidationFailure(format!("unknown variant {variant}"))
                })?;

                let product = state
                    .products
                    .iter_mut()
                    .find(|product| product.uuid() == &uuid)
                    .ok_or_else(|| {
                        CartServiceError::ValidationFailure(format!(
                            "product {uuid} is not in the cart"
                        ))
                    })?;

                product.switch_variant(
                    variant,
                    spec.product_slug.clone(),
                    spec.product_name.clone(),
                    Money::from_minor(spec.price, self.currency),
                );
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CartService for InMemoryCartService {
    async fn get_cart_snapshot(&self) -> Result<Cart, CartServiceError> {
        let state = self.state.lock().await;

        self.snapshot(&state)
    }

    #[instrument(skip(self, request), fields(request_id = %request.request_id))]
    async fn submit_mutation(
        &self,
        request: CartMutationRequest,
    ) -> Result<Cart, CartServiceError> {
        let mut state = self.state.lock().await;

        if let Some(cart) = state.completed.get(&request.request_id) {
            debug!("replayed mutation request");
            return Ok(cart.clone());
        }

        let previous_products = state.products.clone();
        let previous_coupon = state.coupon_code.clone();

        let result = self
            .apply(&mut state, request.mutation)
            .and_then(|()| self.snapshot(&state));

        match result {
            Ok(cart) => {
                info!(products = cart.len(), total = cart.totals().total, "cart updated");
                state.completed.insert(request.request_id, cart.clone());
                Ok(cart)
            }
            Err(error) => {
                state.products = previous_products;
                state.coupon_code = previous_coupon;
                debug!(%error, "cart update rejected");
                Err(error)
            }
        }
    }
}
