//! Catalog Fixtures
//!
//! Product classification, variant terms and coupon codes known to a store.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    classification::SlugSets,
    fixtures::{FixtureError, parse_price_in},
    products::VariantId,
    service::{CartCatalog, CouponDiscount, VariantSpec},
};

/// A variant term as written in a catalog fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantFixture {
    /// Slug of the product the variant switches to
    pub slug: String,

    /// Display name of that product
    pub name: String,

    /// Price (e.g., "168.00 USD")
    pub price: String,
}

/// Catalog fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFixture {
    /// Slugs per product category
    #[serde(default)]
    pub classification: SlugSets,

    /// Variants by id
    #[serde(default)]
    pub variants: FxHashMap<VariantId, VariantFixture>,

    /// Coupon discounts by code, either a percentage ("10%") or a price ("5.00 USD")
    #[serde(default)]
    pub coupons: FxHashMap<String, String>,
}

impl CatalogFixture {
    /// Convert variants and coupons into the catalog the in-memory service uses.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or discount is malformed or not in `currency`.
    pub fn into_cart_catalog(
        self,
        currency: &'static Currency,
    ) -> Result<CartCatalog, FixtureError> {
        let mut catalog = CartCatalog::default();

        for (id, variant) in self.variants {
            let price = parse_price_in(&variant.price, currency)?;

            catalog.variants.insert(
                id,
                VariantSpec {
                    product_slug: variant.slug,
                    product_name: variant.name,
                    price,
                },
            );
        }

        for (code, discount) in self.coupons {
            let discount = parse_discount(&discount, currency)?;

            catalog.coupons.insert(code.to_uppercase(), discount);
        }

        Ok(catalog)
    }
}

/// Parse a coupon discount: "10%" or "5.00 USD".
///
/// # Errors
///
/// Returns an error if a percentage is not a whole number from 0 to 100, or
/// if an amount is not a valid price in `currency`.
pub fn parse_discount(
    s: &str,
    currency: &'static Currency,
) -> Result<CouponDiscount, FixtureError> {
    let Some(percent) = s.trim().strip_suffix('%') else {
        return Ok(CouponDiscount::AmountOff(parse_price_in(s, currency)?));
    };

    percent
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_u8())
        .filter(|value| *value <= 100)
        .map(CouponDiscount::PercentOff)
        .ok_or_else(|| FixtureError::InvalidDiscount(s.to_string()))
}
