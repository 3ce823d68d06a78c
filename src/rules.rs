//! Line item rules
//!
//! Deletability and variant-selector eligibility for product lines. Each rule
//! is an independent veto over a disjoint product category; any veto locks the
//! line and no rule overrides another.

use smallvec::SmallVec;

use crate::{cart::Cart, classification::ProductClassifier, products::CartProduct};

/// Product slugs that can never be removed from the cart.
pub const UNDELETABLE_SLUGS: &[&str] = &["domain_redemption"];

/// Why a product line cannot be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionVeto {
    /// The product belongs to a category that is never removable.
    FixedCategory,

    /// A premium plan is required by a DIFM product in the same cart.
    RequiredByDifm,

    /// A business plan is required by a marketplace product in the same cart.
    RequiredByMarketplace,
}

/// Why a product line does not offer a variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantLock {
    /// The caller has not configured variant changes.
    Disabled,

    /// Renewals repurchase a fixed existing term.
    Renewal,

    /// The plan term is fixed by a DIFM bundle.
    FixedByDifm,
}

/// Veto list for a single product line.
pub type DeletionVetoes = SmallVec<[DeletionVeto; 3]>;

/// True if the product is a premium plan and the cart also contains a DIFM product.
pub fn is_premium_plan_with_difm(
    product: &CartProduct,
    cart: &Cart,
    classifier: &impl ProductClassifier,
) -> bool {
    classifier.is_premium_plan(product) && cart.has_product(|other| classifier.is_difm(other))
}

/// True if any line in the cart is a marketplace add-on.
pub fn has_marketplace_product(cart: &Cart, classifier: &impl ProductClassifier) -> bool {
    cart.has_product(|product| classifier.is_marketplace_item(product))
}

/// Every deletion veto that applies to the product.
///
/// `has_marketplace_product` is passed in so callers can evaluate it once per snapshot.
pub fn deletion_vetoes(
    product: &CartProduct,
    cart: &Cart,
    has_marketplace_product: bool,
    classifier: &impl ProductClassifier,
) -> DeletionVetoes {
    let mut vetoes = DeletionVetoes::new();

    if UNDELETABLE_SLUGS.contains(&product.product_slug()) {
        vetoes.push(DeletionVeto::FixedCategory);
    }

    if is_premium_plan_with_difm(product, cart, classifier) {
        vetoes.push(DeletionVeto::RequiredByDifm);
    }

    if classifier.is_business_plan(product) && has_marketplace_product {
        vetoes.push(DeletionVeto::RequiredByMarketplace);
    }

    vetoes
}

/// Whether the product line may be removed from the cart.
pub fn compute_deletability(
    product: &CartProduct,
    cart: &Cart,
    has_marketplace_product: bool,
    classifier: &impl ProductClassifier,
) -> bool {
    deletion_vetoes(product, cart, has_marketplace_product, classifier).is_empty()
}

/// The reason the variant selector is hidden for the product, if it is.
pub fn variant_selector_lock(
    product: &CartProduct,
    cart: &Cart,
    has_variant_handler: bool,
    classifier: &impl ProductClassifier,
) -> Option<VariantLock> {
    if !has_variant_handler {
        return Some(VariantLock::Disabled);
    }

    if classifier.is_renewal(product) {
        return Some(VariantLock::Renewal);
    }

    if is_premium_plan_with_difm(product, cart, classifier) {
        return Some(VariantLock::FixedByDifm);
    }

    None
}

/// Whether the product line offers a plan-length variant selector.
pub fn compute_variant_selector_visible(
    product: &CartProduct,
    cart: &Cart,
    has_variant_handler: bool,
    classifier: &impl ProductClassifier,
) -> bool {
    variant_selector_lock(product, cart, has_variant_handler, classifier).is_none()
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        cart::{CartError, CartTotals},
        classification::SlugClassifier,
        products::PurchaseType,
    };

    use super::*;

    fn product(uuid: &str, slug: &str) -> CartProduct {
        CartProduct::new(uuid, slug, slug, Money::from_minor(1_000, USD))
    }

    fn cart(products: &[&CartProduct]) -> Result<Cart, CartError> {
        let products: Vec<CartProduct> = products.iter().map(|&product| product.clone()).collect();
        let subtotal = products.iter().map(|product| product.price().to_minor_units()).sum();

        Cart::with_products(
            products,
            None,
            CartTotals {
                subtotal,
                credits: 0,
                total: subtotal,
            },
            USD,
        )
    }

    fn classifier() -> SlugClassifier {
        SlugClassifier::default().with_marketplace_slugs(["woocommerce-bookings"])
    }

    #[test]
    fn domain_redemption_is_never_deletable() -> TestResult {
        let redemption = product("r", "domain_redemption");
        let plan = product("p", "value_bundle");
        let addon = product("m", "woocommerce-bookings");
        let classifier = classifier();

        for cart in [cart(&[&redemption])?, cart(&[&redemption, &plan, &addon])?] {
            for has_marketplace in [false, true] {
                assert!(!compute_deletability(&redemption, &cart, has_marketplace, &classifier));
            }
        }

        Ok(())
    }

    #[test]
    fn premium_plan_locked_by_difm() -> TestResult {
        let plan = product("plan", "value_bundle");
        let difm = product("difm", "wp_difm_lite");
        let cart = cart(&[&plan, &difm])?;
        let classifier = classifier();

        assert!(!compute_deletability(&plan, &cart, false, &classifier));
        assert!(compute_deletability(&difm, &cart, false, &classifier));
        assert!(!compute_variant_selector_visible(&plan, &cart, true, &classifier));
        assert_eq!(
            variant_selector_lock(&plan, &cart, true, &classifier),
            Some(VariantLock::FixedByDifm)
        );

        Ok(())
    }

    #[test]
    fn premium_plan_without_difm_is_free_to_change() -> TestResult {
        let plan = product("plan", "value_bundle");
        let cart = cart(&[&plan])?;
        let classifier = classifier();

        assert!(compute_deletability(&plan, &cart, false, &classifier));
        assert!(compute_variant_selector_visible(&plan, &cart, true, &classifier));

        Ok(())
    }

    #[test]
    fn business_plan_locked_by_marketplace() -> TestResult {
        let plan = product("plan", "business-bundle");
        let addon = product("addon", "woocommerce-bookings");
        let cart = cart(&[&plan, &addon])?;
        let classifier = classifier();
        let has_marketplace = has_marketplace_product(&cart, &classifier);

        assert!(has_marketplace);
        assert!(!compute_deletability(&plan, &cart, has_marketplace, &classifier));
        assert!(compute_deletability(&addon, &cart, has_marketplace, &classifier));
        // The marketplace lock does not hide the variant selector.
        assert!(compute_variant_selector_visible(&plan, &cart, true, &classifier));

        Ok(())
    }

    #[test]
    fn premium_plan_is_not_locked_by_marketplace() -> TestResult {
        let plan = product("plan", "value_bundle");
        let addon = product("addon", "woocommerce-bookings");
        let cart = cart(&[&plan, &addon])?;

        assert!(compute_deletability(&plan, &cart, true, &classifier()));

        Ok(())
    }

    #[test]
    fn both_locks_apply_independently_in_one_cart() -> TestResult {
        let premium = product("premium", "value_bundle");
        let difm = product("difm", "wp_difm_lite");
        let business = product("business", "business-bundle");
        let addon = product("addon", "woocommerce-bookings");
        let cart = cart(&[&premium, &difm, &business, &addon])?;
        let classifier = classifier();
        let has_marketplace = has_marketplace_product(&cart, &classifier);

        assert_eq!(
            deletion_vetoes(&premium, &cart, has_marketplace, &classifier).as_slice(),
            [DeletionVeto::RequiredByDifm]
        );
        assert_eq!(
            deletion_vetoes(&business, &cart, has_marketplace, &classifier).as_slice(),
            [DeletionVeto::RequiredByMarketplace]
        );
        assert!(compute_deletability(&difm, &cart, has_marketplace, &classifier));
        assert!(compute_deletability(&addon, &cart, has_marketplace, &classifier));

        Ok(())
    }

    #[test]
    fn renewal_hides_variant_selector() -> TestResult {
        let renewal = product("renewal", "value_bundle").with_purchase_type(PurchaseType::Renewal);
        let cart = cart(&[&renewal])?;
        let classifier = classifier();

        assert_eq!(
            variant_selector_lock(&renewal, &cart, true, &classifier),
            Some(VariantLock::Renewal)
        );
        assert!(compute_deletability(&renewal, &cart, false, &classifier));

        Ok(())
    }

    #[test]
    fn missing_handler_disables_variant_selector() -> TestResult {
        let plan = product("plan", "business-bundle");
        let cart = cart(&[&plan])?;

        assert_eq!(
            variant_selector_lock(&plan, &cart, false, &classifier()),
            Some(VariantLock::Disabled)
        );

        Ok(())
    }
}
