//! Order review
//!
//! Everything the order-review list displays, derived from a single cart
//! snapshot. Derivation always starts from scratch: nothing is carried over
//! from a previous snapshot.

use rusty_money::{Money, iso::Currency};

use crate::{
    adjustments::{AdjustmentItems, derive_adjustment_items},
    cart::Cart,
    classification::ProductClassifier,
    products::{CartProduct, LineItemUuid},
    rules::{
        DeletionVetoes, VariantLock, deletion_vetoes, has_marketplace_product,
        variant_selector_lock,
    },
};

pub mod site;
pub mod table;

/// Caller configuration of the review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewOptions {
    /// Whether the caller handles plan-length variant changes.
    pub variant_changes_enabled: bool,

    /// Compact summary rendering (no coupon delete button).
    pub is_summary: bool,
}

/// A product row in the review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewLineItem {
    /// Line uuid
    pub uuid: LineItemUuid,

    /// Product slug
    pub product_slug: String,

    /// Product display name
    pub product_name: String,

    /// Line price
    pub price: Money<'static, Currency>,

    /// Rules that lock the line in the cart; empty when it can be removed.
    pub vetoes: DeletionVetoes,

    /// Why no variant selector is offered; `None` when it is.
    pub variant_lock: Option<VariantLock>,
}

impl ReviewLineItem {
    fn derive(
        product: &CartProduct,
        cart: &Cart,
        has_marketplace: bool,
        classifier: &impl ProductClassifier,
        options: ReviewOptions,
    ) -> Self {
        Self {
            uuid: product.uuid().clone(),
            product_slug: product.product_slug().to_string(),
            product_name: product.product_name().to_string(),
            price: product.price(),
            vetoes: deletion_vetoes(product, cart, has_marketplace, classifier),
            variant_lock: variant_selector_lock(
                product,
                cart,
                options.variant_changes_enabled,
                classifier,
            ),
        }
    }

    /// Whether the row shows a delete button.
    pub fn deletable(&self) -> bool {
        self.vetoes.is_empty()
    }

    /// Whether the row shows a plan-length variant selector.
    pub fn variant_selector_visible(&self) -> bool {
        self.variant_lock.is_none()
    }
}

/// Display state of the order review for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReview {
    /// Product rows in cart order.
    pub line_items: Vec<ReviewLineItem>,

    /// Coupon and credits rows.
    pub adjustments: AdjustmentItems,

    /// Whether the coupon row carries a delete button.
    pub coupon_deletable: bool,

    /// Subtotal before coupon and credits.
    pub subtotal: Money<'static, Currency>,

    /// Amount payable.
    pub total: Money<'static, Currency>,

    /// Whether nothing is payable.
    pub is_purchase_free: bool,
}

impl OrderReview {
    /// Find a product row by uuid.
    pub fn line_item(&self, uuid: &LineItemUuid) -> Option<&ReviewLineItem> {
        self.line_items.iter().find(|item| &item.uuid == uuid)
    }

    /// Whether the product row exists and can be removed.
    pub fn deletable(&self, uuid: &LineItemUuid) -> bool {
        self.line_item(uuid).is_some_and(ReviewLineItem::deletable)
    }

    /// Whether the product row exists and offers a variant selector.
    pub fn variant_selector_visible(&self, uuid: &LineItemUuid) -> bool {
        self.line_item(uuid)
            .is_some_and(ReviewLineItem::variant_selector_visible)
    }
}

/// Derive the full review state from a snapshot.
pub fn derive_review(
    cart: &Cart,
    classifier: &impl ProductClassifier,
    options: ReviewOptions,
) -> OrderReview {
    let has_marketplace = has_marketplace_product(cart, classifier);

    let line_items = cart
        .products()
        .iter()
        .map(|product| ReviewLineItem::derive(product, cart, has_marketplace, classifier, options))
        .collect();

    OrderReview {
        line_items,
        adjustments: derive_adjustment_items(cart),
        coupon_deletable: !options.is_summary,
        subtotal: cart.subtotal(),
        total: cart.total(),
        is_purchase_free: cart.is_purchase_free(),
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        cart::{AppliedCoupon, CartError, CartTotals},
        classification::SlugClassifier,
        rules::DeletionVeto,
    };

    use super::*;

    fn difm_cart() -> Result<Cart, CartError> {
        Cart::with_products(
            [
                CartProduct::new("plan", "value_bundle", "Premium", Money::from_minor(9_600, USD)),
                CartProduct::new(
                    "difm",
                    "wp_difm_lite",
                    "Website Design Service",
                    Money::from_minor(24_900, USD),
                ),
            ],
            Some(AppliedCoupon {
                code: "SAVE10".to_string(),
                savings: 1_000,
            }),
            CartTotals {
                subtotal: 34_500,
                credits: 500,
                total: 33_000,
            },
            USD,
        )
    }

    #[test]
    fn rows_follow_cart_order() -> TestResult {
        let review = derive_review(
            &difm_cart()?,
            &SlugClassifier::default(),
            ReviewOptions::default(),
        );

        let uuids: Vec<&str> = review.line_items.iter().map(|item| item.uuid.as_str()).collect();

        assert_eq!(uuids, ["plan", "difm"]);

        Ok(())
    }

    #[test]
    fn rows_carry_rule_outcomes() -> TestResult {
        let options = ReviewOptions {
            variant_changes_enabled: true,
            is_summary: false,
        };
        let review = derive_review(&difm_cart()?, &SlugClassifier::default(), options);

        let plan = LineItemUuid::new("plan");
        let difm = LineItemUuid::new("difm");

        assert!(!review.deletable(&plan));
        assert!(review.deletable(&difm));
        assert!(!review.variant_selector_visible(&plan));
        assert!(review.variant_selector_visible(&difm));
        assert_eq!(
            review.line_item(&plan).map(|item| item.vetoes.as_slice()),
            Some([DeletionVeto::RequiredByDifm].as_slice())
        );

        Ok(())
    }

    #[test]
    fn unknown_uuid_is_neither_deletable_nor_selectable() -> TestResult {
        let review = derive_review(
            &difm_cart()?,
            &SlugClassifier::default(),
            ReviewOptions::default(),
        );
        let ghost = LineItemUuid::new("ghost");

        assert!(!review.deletable(&ghost));
        assert!(!review.variant_selector_visible(&ghost));

        Ok(())
    }

    #[test]
    fn summary_mode_drops_coupon_delete_button() -> TestResult {
        let cart = difm_cart()?;
        let classifier = SlugClassifier::default();

        let full = derive_review(&cart, &classifier, ReviewOptions::default());
        let summary = derive_review(
            &cart,
            &classifier,
            ReviewOptions {
                is_summary: true,
                ..ReviewOptions::default()
            },
        );

        assert!(full.coupon_deletable);
        assert!(!summary.coupon_deletable);
        assert_eq!(full.adjustments, summary.adjustments);

        Ok(())
    }

    #[test]
    fn totals_come_from_snapshot() -> TestResult {
        let review = derive_review(
            &difm_cart()?,
            &SlugClassifier::default(),
            ReviewOptions::default(),
        );

        assert_eq!(review.subtotal, Money::from_minor(34_500, USD));
        assert_eq!(review.total, Money::from_minor(33_000, USD));
        assert!(!review.is_purchase_free);
        assert!(review.adjustments.coupon.is_some());
        assert!(review.adjustments.credits.is_some());

        Ok(())
    }
}
