//! Cart Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Identifier of a product line within a cart.
///
/// Unique within a single cart and stable across snapshots of that cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemUuid(String);

impl LineItemUuid {
    /// Create a line item uuid from any string-like value.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self(uuid.into())
    }

    /// Borrow the uuid as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineItemUuid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LineItemUuid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of a plan-length variant (e.g. the monthly or two-year term of a plan).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    /// Create a variant id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Whether a product line is a first purchase or a repurchase of an existing term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseType {
    /// A new purchase.
    #[default]
    New,

    /// A renewal of something the customer already owns.
    Renewal,
}

/// A single product line in a cart snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CartProduct {
    uuid: LineItemUuid,
    product_slug: String,
    product_name: String,
    meta: Option<String>,
    price: Money<'static, Currency>,
    purchase_type: PurchaseType,
    variant: Option<VariantId>,
    is_domain_registration: bool,
}

impl CartProduct {
    /// Create a new-purchase product line with no meta, variant or domain flags.
    pub fn new(
        uuid: impl Into<LineItemUuid>,
        product_slug: impl Into<String>,
        product_name: impl Into<String>,
        price: Money<'static, Currency>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            product_slug: product_slug.into(),
            product_name: product_name.into(),
            meta: None,
            price,
            purchase_type: PurchaseType::New,
            variant: None,
            is_domain_registration: false,
        }
    }

    /// Set the descriptive meta payload (for domain products, the domain name).
    #[must_use]
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Set the purchase type.
    #[must_use]
    pub fn with_purchase_type(mut self, purchase_type: PurchaseType) -> Self {
        self.purchase_type = purchase_type;
        self
    }

    /// Set the currently selected variant.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<VariantId>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Mark the line as a domain registration.
    #[must_use]
    pub fn with_domain_registration(mut self, is_domain_registration: bool) -> Self {
        self.is_domain_registration = is_domain_registration;
        self
    }

    /// Line uuid
    pub fn uuid(&self) -> &LineItemUuid {
        &self.uuid
    }

    /// Product slug
    pub fn product_slug(&self) -> &str {
        &self.product_slug
    }

    /// Product display name
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Descriptive meta payload, if any.
    pub fn meta(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    /// Line price
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }

    /// Purchase type
    pub fn purchase_type(&self) -> PurchaseType {
        self.purchase_type
    }

    /// Currently selected variant, if the product has variants.
    pub fn variant(&self) -> Option<&VariantId> {
        self.variant.as_ref()
    }

    /// Whether the upstream cart flagged this line as a domain registration.
    pub fn is_domain_registration(&self) -> bool {
        self.is_domain_registration
    }

    /// Whether this line renews an existing purchase.
    pub fn is_renewal(&self) -> bool {
        self.purchase_type == PurchaseType::Renewal
    }

    /// Replace the slug, name, price and variant, keeping the line uuid.
    pub(crate) fn switch_variant(
        &mut self,
        variant: VariantId,
        product_slug: String,
        product_name: String,
        price: Money<'static, Currency>,
    ) {
        self.variant = Some(variant);
        self.product_slug = product_slug;
        self.product_name = product_name;
        self.price = price;
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn builder_sets_optional_fields() {
        let product = CartProduct::new(
            "p1",
            "dotcom_domain",
            "example.com",
            Money::from_minor(1_800, USD),
        )
        .with_meta("example.com")
        .with_domain_registration(true)
        .with_purchase_type(PurchaseType::Renewal)
        .with_variant("dotcom_domain-1y");

        assert_eq!(product.uuid().as_str(), "p1");
        assert_eq!(product.meta(), Some("example.com"));
        assert!(product.is_domain_registration());
        assert!(product.is_renewal());
        assert_eq!(product.variant().map(VariantId::as_str), Some("dotcom_domain-1y"));
    }

    #[test]
    fn new_product_defaults_to_new_purchase() {
        let product = CartProduct::new(
            "p1",
            "business-bundle",
            "Business",
            Money::from_minor(30_000, USD),
        );

        assert_eq!(product.purchase_type(), PurchaseType::New);
        assert!(!product.is_renewal());
        assert!(product.meta().is_none());
        assert!(product.variant().is_none());
    }

    #[test]
    fn switch_variant_keeps_uuid() {
        let mut product =
            CartProduct::new("p1", "value_bundle", "Premium", Money::from_minor(9_600, USD))
                .with_variant("value_bundle");

        product.switch_variant(
            VariantId::new("value_bundle-2y"),
            "value_bundle-2y".to_string(),
            "Premium (2 years)".to_string(),
            Money::from_minor(16_800, USD),
        );

        assert_eq!(product.uuid().as_str(), "p1");
        assert_eq!(product.product_slug(), "value_bundle-2y");
        assert_eq!(product.price(), Money::from_minor(16_800, USD));
    }
}
