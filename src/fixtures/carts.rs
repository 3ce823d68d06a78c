//! Cart Fixtures

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_price_in},
    products::{CartProduct, LineItemUuid, PurchaseType, VariantId},
};

/// A product line as written in a cart fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFixture {
    /// Line item uuid
    pub uuid: LineItemUuid,

    /// Product slug
    pub slug: String,

    /// Display name
    pub name: String,

    /// Price (e.g., "96.00 USD")
    pub price: String,

    /// Optional meta, the domain name for domain products
    #[serde(default)]
    pub meta: Option<String>,

    /// New purchase or renewal
    #[serde(default)]
    pub purchase_type: PurchaseType,

    /// Current plan-length variant
    #[serde(default)]
    pub variant: Option<VariantId>,

    /// Whether the line registers a new domain
    #[serde(default)]
    pub domain_registration: bool,
}

impl ProductFixture {
    fn to_product(&self, currency: &'static Currency) -> Result<CartProduct, FixtureError> {
        let minor_units = parse_price_in(&self.price, currency)?;

        let mut product = CartProduct::new(
            self.uuid.clone(),
            self.slug.clone(),
            self.name.clone(),
            Money::from_minor(minor_units, currency),
        )
        .with_purchase_type(self.purchase_type)
        .with_domain_registration(self.domain_registration);

        if let Some(meta) = &self.meta {
            product = product.with_meta(meta.clone());
        }

        if let Some(variant) = &self.variant {
            product = product.with_variant(variant.clone());
        }

        Ok(product)
    }
}

/// Cart fixture file: currency, product lines, credits and an applied coupon.
#[derive(Debug, Clone, Deserialize)]
pub struct CartFixture {
    /// ISO currency code shared by every price in the cart
    pub currency: String,

    /// Product lines in cart order
    #[serde(default)]
    pub products: Vec<ProductFixture>,

    /// Account credits available to the cart (e.g., "5.00 USD")
    #[serde(default)]
    pub credits: Option<String>,

    /// Coupon code applied before the review starts
    #[serde(default)]
    pub coupon: Option<String>,
}

impl CartFixture {
    /// Convert the product lines into cart products.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed or not in `currency`.
    pub fn products(&self, currency: &'static Currency) -> Result<Vec<CartProduct>, FixtureError> {
        self.products
            .iter()
            .map(|product| product.to_product(currency))
            .collect()
    }

    /// Available credits in minor units, zero when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the credits amount is malformed or not in `currency`.
    pub fn credits_minor_units(&self, currency: &'static Currency) -> Result<i64, FixtureError> {
        self.credits
            .as_deref()
            .map_or(Ok(0), |credits| parse_price_in(credits, currency))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn deserializes_products_with_defaults() -> TestResult {
        let fixture: CartFixture = serde_norway::from_str(
            "currency: USD\n\
             products:\n  \
               - uuid: renewal\n    \
                 slug: value_bundle\n    \
                 name: Premium\n    \
                 price: \"96.00 USD\"\n    \
                 purchase_type: renewal\n  \
               - uuid: domain\n    \
                 slug: dotcom_domain\n    \
                 name: example.com\n    \
                 price: \"18.00 USD\"\n    \
                 meta: example.com\n    \
                 domain_registration: true\n",
        )?;

        let products = fixture.products(USD)?;

        assert_eq!(products.len(), 2);
        assert!(products[0].is_renewal());
        assert_eq!(products[0].price(), Money::from_minor(9_600, USD));
        assert_eq!(products[1].meta(), Some("example.com"));
        assert!(products[1].is_domain_registration());
        assert_eq!(fixture.credits_minor_units(USD)?, 0);

        Ok(())
    }

    #[test]
    fn credits_must_match_cart_currency() -> TestResult {
        let fixture: CartFixture =
            serde_norway::from_str("currency: USD\ncredits: \"5.00 EUR\"\n")?;

        assert!(matches!(
            fixture.credits_minor_units(USD),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));

        Ok(())
    }
}
