//! Adjustment line items
//!
//! Coupon and credits rows are derived from a cart snapshot on every call and
//! never stored.

use rusty_money::{Money, iso::Currency};

use crate::cart::Cart;

/// Stable id of the coupon row.
pub const COUPON_LINE_ITEM_ID: &str = "coupon-line-item";

/// Stable id of the credits row.
pub const CREDITS_LINE_ITEM_ID: &str = "credits";

/// A coupon row.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponLineItem {
    /// Row id
    pub id: &'static str,

    /// Applied coupon code
    pub code: String,

    /// Negative amount deducted by the coupon.
    pub amount: Money<'static, Currency>,
}

/// A credits row.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditsLineItem {
    /// Row id
    pub id: &'static str,

    /// Negative amount deducted by credits.
    pub amount: Money<'static, Currency>,
}

/// Adjustment rows shown after the product rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustmentItems {
    /// Coupon row, present whenever a coupon is applied.
    pub coupon: Option<CouponLineItem>,

    /// Credits row, present when credits exist and the subtotal is positive.
    pub credits: Option<CreditsLineItem>,
}

/// The coupon row the cart carries upstream, if a coupon is applied.
pub fn coupon_line_item(cart: &Cart) -> Option<CouponLineItem> {
    cart.coupon().map(|coupon| CouponLineItem {
        id: COUPON_LINE_ITEM_ID,
        code: coupon.code.clone(),
        amount: Money::from_minor(-coupon.savings, cart.currency()),
    })
}

/// The credits row the cart carries upstream, if credits are applied.
pub fn credits_line_item(cart: &Cart) -> Option<CreditsLineItem> {
    let credits = cart.totals().credits;

    (credits > 0).then(|| CreditsLineItem {
        id: CREDITS_LINE_ITEM_ID,
        amount: Money::from_minor(-credits, cart.currency()),
    })
}

/// Derive the coupon and credits rows for a snapshot.
///
/// A credits row on a zero-subtotal cart would show a credit against nothing,
/// so it is suppressed until the subtotal is positive.
pub fn derive_adjustment_items(cart: &Cart) -> AdjustmentItems {
    AdjustmentItems {
        coupon: coupon_line_item(cart),
        credits: credits_line_item(cart).filter(|_| cart.totals().subtotal > 0),
    }
}
