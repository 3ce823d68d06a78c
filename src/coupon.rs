//! Coupon field state

use crate::cart::Cart;

/// Status of the coupon the customer is entering or has applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CouponStatus {
    /// No coupon applied or pending.
    #[default]
    None,

    /// A coupon code has been submitted and awaits the cart service.
    Pending,

    /// The cart carries an applied coupon.
    Applied,

    /// The last submitted code was rejected by the cart service.
    Invalid,
}

impl CouponStatus {
    /// Status implied by a freshly accepted snapshot.
    pub fn from_cart(cart: &Cart) -> Self {
        if cart.coupon().is_some() {
            Self::Applied
        } else {
            Self::None
        }
    }
}

/// Transient coupon-entry state owned by the review, not the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponField {
    visible: bool,
    value: String,
}

impl CouponField {
    /// Whether the input has been opened.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Typed, not yet submitted code.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Open the input.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Replace the typed value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Clear the typed value, keeping visibility.
    pub fn clear_value(&mut self) {
        self.value.clear();
    }

    /// Clear the typed value and close the input.
    pub fn reset(&mut self) {
        self.value.clear();
        self.visible = false;
    }
}

/// What the coupon area below the line items shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponAffordance {
    /// Nothing: the purchase is free or a coupon is already applied.
    Hidden,

    /// A "have a coupon?" link that opens the input.
    Prompt,

    /// The coupon input itself.
    Field {
        /// Input is disabled while a cart update is in flight.
        disabled: bool,

        /// Status to decorate the input with.
        status: CouponStatus,
    },
}

/// Decide what the coupon area shows.
pub fn coupon_affordance(
    cart: &Cart,
    status: CouponStatus,
    field: &CouponField,
    form_ready: bool,
) -> CouponAffordance {
    if cart.is_purchase_free() || status == CouponStatus::Applied {
        return CouponAffordance::Hidden;
    }

    if field.is_visible() {
        return CouponAffordance::Field {
            disabled: !form_ready,
            status,
        };
    }

    CouponAffordance::Prompt
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        cart::{AppliedCoupon, CartError, CartTotals},
        products::CartProduct,
    };

    use super::*;

    fn cart(total: i64, coupon: Option<AppliedCoupon>) -> Result<Cart, CartError> {
        Cart::with_products(
            [CartProduct::new("p1", "value_bundle", "Premium", Money::from_minor(1_000, USD))],
            coupon,
            CartTotals {
                subtotal: 1_000,
                credits: 0,
                total,
            },
            USD,
        )
    }

    #[test]
    fn free_purchase_hides_coupon_area() -> TestResult {
        let mut field = CouponField::default();
        field.show();

        let affordance = coupon_affordance(&cart(0, None)?, CouponStatus::None, &field, true);

        assert_eq!(affordance, CouponAffordance::Hidden);

        Ok(())
    }

    #[test]
    fn applied_coupon_hides_coupon_area() -> TestResult {
        let coupon = AppliedCoupon {
            code: "SAVE10".to_string(),
            savings: 100,
        };

        let affordance = coupon_affordance(
            &cart(900, Some(coupon))?,
            CouponStatus::Applied,
            &CouponField::default(),
            true,
        );

        assert_eq!(affordance, CouponAffordance::Hidden);

        Ok(())
    }

    #[test]
    fn closed_field_shows_prompt() -> TestResult {
        let affordance = coupon_affordance(
            &cart(1_000, None)?,
            CouponStatus::None,
            &CouponField::default(),
            true,
        );

        assert_eq!(affordance, CouponAffordance::Prompt);

        Ok(())
    }

    #[test]
    fn open_field_is_disabled_while_not_ready() -> TestResult {
        let mut field = CouponField::default();
        field.show();

        let affordance =
            coupon_affordance(&cart(1_000, None)?, CouponStatus::Pending, &field, false);

        assert_eq!(
            affordance,
            CouponAffordance::Field {
                disabled: true,
                status: CouponStatus::Pending,
            }
        );

        Ok(())
    }

    #[test]
    fn status_from_cart_follows_coupon() -> TestResult {
        let coupon = AppliedCoupon {
            code: "SAVE10".to_string(),
            savings: 100,
        };

        assert_eq!(CouponStatus::from_cart(&cart(900, Some(coupon))?), CouponStatus::Applied);
        assert_eq!(CouponStatus::from_cart(&cart(1_000, None)?), CouponStatus::None);

        Ok(())
    }

    #[test]
    fn reset_clears_value_and_visibility() {
        let mut field = CouponField::default();
        field.show();
        field.set_value("SAVE10");

        field.reset();

        assert_eq!(field, CouponField::default());
    }
}
