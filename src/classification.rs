//! Product Classification
//!
//! The review rules never inspect product slugs directly. They ask a
//! [`ProductClassifier`], which callers supply, so that catalog knowledge
//! (which slugs are premium plans, which are marketplace add-ons, ...) stays
//! outside the engine.

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::products::CartProduct;

/// Pure predicates over a product line.
pub trait ProductClassifier {
    /// Premium plan, in any term.
    fn is_premium_plan(&self, product: &CartProduct) -> bool;

    /// Business plan, in any term.
    fn is_business_plan(&self, product: &CartProduct) -> bool;

    /// "Done-for-me" site setup product.
    fn is_difm(&self, product: &CartProduct) -> bool;

    /// Third-party marketplace add-on.
    fn is_marketplace_item(&self, product: &CartProduct) -> bool;

    /// P2+ plan.
    fn is_p2_plus_plan(&self, product: &CartProduct) -> bool;

    /// Incoming domain transfer.
    fn is_domain_transfer(&self, product: &CartProduct) -> bool;

    /// Domain mapping.
    fn is_domain_mapping(&self, product: &CartProduct) -> bool;

    /// New domain registration.
    fn is_domain_registration(&self, product: &CartProduct) -> bool {
        product.is_domain_registration()
    }

    /// Renewal of an existing purchase.
    fn is_renewal(&self, product: &CartProduct) -> bool {
        product.is_renewal()
    }

    /// Any domain product that names the site's domain in its meta.
    fn is_domain_product(&self, product: &CartProduct) -> bool {
        self.is_domain_transfer(product)
            || self.is_domain_registration(product)
            || self.is_domain_mapping(product)
    }
}

impl<C: ProductClassifier + ?Sized> ProductClassifier for &C {
    fn is_premium_plan(&self, product: &CartProduct) -> bool {
        (**self).is_premium_plan(product)
    }

    fn is_business_plan(&self, product: &CartProduct) -> bool {
        (**self).is_business_plan(product)
    }

    fn is_difm(&self, product: &CartProduct) -> bool {
        (**self).is_difm(product)
    }

    fn is_marketplace_item(&self, product: &CartProduct) -> bool {
        (**self).is_marketplace_item(product)
    }

    fn is_p2_plus_plan(&self, product: &CartProduct) -> bool {
        (**self).is_p2_plus_plan(product)
    }

    fn is_domain_transfer(&self, product: &CartProduct) -> bool {
        (**self).is_domain_transfer(product)
    }

    fn is_domain_mapping(&self, product: &CartProduct) -> bool {
        (**self).is_domain_mapping(product)
    }

    fn is_domain_registration(&self, product: &CartProduct) -> bool {
        (**self).is_domain_registration(product)
    }

    fn is_renewal(&self, product: &CartProduct) -> bool {
        (**self).is_renewal(product)
    }
}

/// Slug sets describing each product category.
///
/// Deserializes from the `classification` section of a catalog fixture.
/// Categories missing from the fixture fall back to [`SlugSets::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlugSets {
    /// Premium plan slugs.
    pub premium: Vec<String>,

    /// Business plan slugs.
    pub business: Vec<String>,

    /// DIFM slugs.
    pub difm: Vec<String>,

    /// Marketplace add-on slugs.
    pub marketplace: Vec<String>,

    /// P2+ plan slugs.
    pub p2_plus: Vec<String>,

    /// Domain transfer slugs.
    pub domain_transfer: Vec<String>,

    /// Domain mapping slugs.
    pub domain_mapping: Vec<String>,
}

fn owned(slugs: &[&str]) -> Vec<String> {
    slugs.iter().map(ToString::to_string).collect()
}

impl Default for SlugSets {
    fn default() -> Self {
        Self {
            premium: owned(&[
                "value_bundle",
                "value_bundle-2y",
                "value_bundle_monthly",
                "jetpack_premium",
                "jetpack_premium_monthly",
            ]),
            business: owned(&[
                "business-bundle",
                "business-bundle-2y",
                "business-bundle-monthly",
                "jetpack_business",
                "jetpack_business_monthly",
            ]),
            difm: owned(&["wp_difm_lite"]),
            marketplace: Vec::new(),
            p2_plus: owned(&["wp_p2_plus_monthly"]),
            domain_transfer: owned(&["domain_transfer"]),
            domain_mapping: owned(&["domain_map"]),
        }
    }
}

/// Classifier backed by exact slug membership.
#[derive(Debug, Clone)]
pub struct SlugClassifier {
    premium: FxHashSet<String>,
    business: FxHashSet<String>,
    difm: FxHashSet<String>,
    marketplace: FxHashSet<String>,
    p2_plus: FxHashSet<String>,
    domain_transfer: FxHashSet<String>,
    domain_mapping: FxHashSet<String>,
}

impl SlugClassifier {
    /// Build a classifier from slug sets.
    pub fn new(sets: SlugSets) -> Self {
        Self {
            premium: sets.premium.into_iter().collect(),
            business: sets.business.into_iter().collect(),
            difm: sets.difm.into_iter().collect(),
            marketplace: sets.marketplace.into_iter().collect(),
            p2_plus: sets.p2_plus.into_iter().collect(),
            domain_transfer: sets.domain_transfer.into_iter().collect(),
            domain_mapping: sets.domain_mapping.into_iter().collect(),
        }
    }

    /// Register additional marketplace slugs, e.g. from a product listing.
    #[must_use]
    pub fn with_marketplace_slugs<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.marketplace.extend(slugs.into_iter().map(Into::into));
        self
    }
}

impl Default for SlugClassifier {
    fn default() -> Self {
        Self::new(SlugSets::default())
    }
}

impl ProductClassifier for SlugClassifier {
    fn is_premium_plan(&self, product: &CartProduct) -> bool {
        self.premium.contains(product.product_slug())
    }

    fn is_business_plan(&self, product: &CartProduct) -> bool {
        self.business.contains(product.product_slug())
    }

    fn is_difm(&self, product: &CartProduct) -> bool {
        self.difm.contains(product.product_slug())
    }

    fn is_marketplace_item(&self, product: &CartProduct) -> bool {
        self.marketplace.contains(product.product_slug())
    }

    fn is_p2_plus_plan(&self, product: &CartProduct) -> bool {
        self.p2_plus.contains(product.product_slug())
    }

    fn is_domain_transfer(&self, product: &CartProduct) -> bool {
        self.domain_transfer.contains(product.product_slug())
    }

    fn is_domain_mapping(&self, product: &CartProduct) -> bool {
        self.domain_mapping.contains(product.product_slug())
    }
}
