//! Fixtures
//!
//! YAML descriptions of carts and catalogs, used by the demo binary and tests.

use std::{fs, path::PathBuf};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::{
    classification::SlugClassifier,
    fixtures::{carts::CartFixture, catalog::CatalogFixture},
    service::InMemoryCartService,
};

pub mod carts;
pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid coupon discount format
    #[error("Invalid coupon discount: {0}")]
    InvalidDiscount(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between the cart and one of its prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),
}

/// Fixture loader rooted at a directory containing `carts/` and `catalogs/`.
#[derive(Debug, Clone)]
pub struct Fixture {
    base_path: PathBuf,
}

impl Fixture {
    /// Create a loader with the default `./fixtures` base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load `carts/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&self, name: &str) -> Result<CartFixture, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load `catalogs/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_catalog(&self, name: &str) -> Result<CatalogFixture, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Build an in-memory cart service and classifier from a cart and a catalog fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture cannot be loaded, or a price is
    /// malformed or in a different currency from the cart.
    pub fn cart_service(
        &self,
        cart: &str,
        catalog: &str,
    ) -> Result<(InMemoryCartService, SlugClassifier), FixtureError> {
        let cart = self.load_cart(cart)?;
        let catalog = self.load_catalog(catalog)?;

        let currency = parse_currency(&cart.currency)?;
        let classifier = SlugClassifier::new(catalog.classification.clone());
        let cart_catalog = catalog.into_cart_catalog(currency)?;

        let coupon = cart.coupon.clone();
        let service = InMemoryCartService::new(
            cart.products(currency)?,
            cart.credits_minor_units(currency)?,
            cart_catalog,
            currency,
        );

        let service = match coupon {
            Some(code) => service.with_coupon(code),
            None => service,
        };

        Ok((service, classifier))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up an ISO currency by its alpha code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes `rusty-money` does not know.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))
}

/// Parse price string (e.g., "2.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(currency_code)?;

    let scale = Decimal::from(10_i64.pow(currency.exponent));

    let minor_units = amount
        .checked_mul(scale)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse a price and check it is in the expected currency.
///
/// # Errors
///
/// Returns an error if the price is malformed or uses another currency.
pub fn parse_price_in(s: &str, currency: &'static Currency) -> Result<i64, FixtureError> {
    let (minor_units, price_currency) = parse_price(s)?;

    if price_currency != currency {
        return Err(FixtureError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            price_currency.iso_alpha_code.to_string(),
        ));
    }

    Ok(minor_units)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rusty_money::iso::{EUR, JPY, USD};
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::service::CartService;

    use super::*;

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        assert_eq!(parse_price("96.00 USD")?, (9_600, USD));
        assert_eq!(parse_price("2.99 EUR")?, (299, EUR));

        Ok(())
    }

    #[test]
    fn parse_price_respects_currency_exponent() -> TestResult {
        assert_eq!(parse_price("1200 JPY")?, (1_200, JPY));

        Ok(())
    }

    #[test]
    fn parse_price_rejects_bad_format() {
        assert!(matches!(parse_price("12.00"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("12.00 USD extra"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("twelve USD"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("12.00 XXQ"), Err(FixtureError::UnknownCurrency(_))));
    }

    #[test]
    fn parse_price_in_checks_currency() {
        assert!(matches!(
            parse_price_in("12.00 EUR", USD),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));
    }

    #[tokio::test]
    async fn cart_service_loads_from_directory() -> TestResult {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("carts"))?;
        fs::create_dir_all(dir.path().join("catalogs"))?;

        fs::write(
            dir.path().join("carts").join("basic.yml"),
            "currency: USD\n\
             credits: \"5.00 USD\"\n\
             coupon: save10\n\
             products:\n  \
               - uuid: plan\n    \
                 slug: business-bundle\n    \
                 name: Business\n    \
                 price: \"300.00 USD\"\n  \
               - uuid: addon\n    \
                 slug: woocommerce-bookings\n    \
                 name: Bookings\n    \
                 price: \"100.00 USD\"\n",
        )?;

        fs::write(
            dir.path().join("catalogs").join("basic.yml"),
            "classification:\n  \
               marketplace: [woocommerce-bookings]\n\
             coupons:\n  \
               SAVE10: \"10%\"\n",
        )?;

        let (service, classifier) =
            Fixture::with_base_path(dir.path()).cart_service("basic", "basic")?;
        let cart = service.get_cart_snapshot().await?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.totals().subtotal, 40_000);
        assert_eq!(cart.coupon().map(|coupon| coupon.savings), Some(4_000));
        assert_eq!(cart.totals().credits, 500);
        assert_eq!(cart.totals().total, 35_500);
        assert!(crate::rules::has_marketplace_product(&cart, &classifier));

        Ok(())
    }

    #[test]
    fn missing_fixture_is_io_error() {
        let result = Fixture::with_base_path("/nonexistent").load_cart("basic");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
