//! Command line configuration for the review binary.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    commands::CartCommand,
    config::{logging::LoggingConfig, site::SiteConfig},
    products::{LineItemUuid, VariantId},
    review::ReviewOptions,
};

pub mod logging;
pub mod site;

/// Cart review configuration
#[derive(Debug, Parser)]
#[command(name = "cart-review", about = "Review a cart before checkout", long_about = None)]
pub struct ReviewConfig {
    /// Directory containing `carts/` and `catalogs/` fixtures
    #[arg(long, env = "CART_REVIEW_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Cart fixture name
    #[arg(short, long, env = "CART_REVIEW_CART", default_value = "premium-with-domain")]
    pub cart: String,

    /// Catalog fixture name
    #[arg(long, env = "CART_REVIEW_CATALOG", default_value = "default")]
    pub catalog: String,

    /// Render the review as an order summary (coupon rows cannot be removed)
    #[arg(long, env = "CART_REVIEW_SUMMARY")]
    pub summary: bool,

    /// Allow switching plan-length variants
    #[arg(long, env = "CART_REVIEW_VARIANTS")]
    pub variants: bool,

    /// Product lines to remove
    #[arg(long = "remove", value_name = "UUID")]
    pub remove: Vec<String>,

    /// Variant changes to apply, as `UUID=VARIANT`
    #[arg(long = "variant", value_name = "UUID=VARIANT", value_parser = parse_variant_change)]
    pub change_variant: Vec<(LineItemUuid, VariantId)>,

    /// Remove the applied coupon
    #[arg(long)]
    pub remove_coupon: bool,

    /// Coupon code to apply
    #[arg(long, value_name = "CODE")]
    pub coupon: Option<String>,

    /// Site the checkout is for.
    #[command(flatten)]
    pub site: SiteConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl ReviewConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Review options derived from the flags.
    #[must_use]
    pub fn review_options(&self) -> ReviewOptions {
        ReviewOptions {
            variant_changes_enabled: self.variants,
            is_summary: self.summary,
        }
    }

    /// Commands to submit, in order: removals, variant changes, coupon removal, coupon.
    #[must_use]
    pub fn commands(&self) -> Vec<CartCommand> {
        let removals = self
            .remove
            .iter()
            .map(|uuid| CartCommand::RemoveProduct(LineItemUuid::new(uuid.as_str())));

        let variant_changes = self
            .change_variant
            .iter()
            .map(|(uuid, variant)| CartCommand::ChangeVariant(uuid.clone(), variant.clone()));

        let remove_coupon = self.remove_coupon.then_some(CartCommand::RemoveCoupon);

        let coupon = self.coupon.clone().map(CartCommand::ApplyCoupon);

        removals
            .chain(variant_changes)
            .chain(remove_coupon)
            .chain(coupon)
            .collect()
    }
}

fn parse_variant_change(value: &str) -> Result<(LineItemUuid, VariantId), String> {
    match value.split_once('=') {
        Some((uuid, variant)) if !uuid.is_empty() && !variant.is_empty() => {
            Ok((LineItemUuid::new(uuid), VariantId::new(variant)))
        }
        _ => Err(format!("expected UUID=VARIANT, got `{value}`")),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn commands_follow_flag_order() -> TestResult {
        let config = ReviewConfig::try_parse_from([
            "cart-review",
            "--coupon",
            "save10",
            "--remove",
            "domain",
            "--variant",
            "plan=value_bundle-2y",
            "--remove-coupon",
        ])?;

        assert_eq!(
            config.commands(),
            [
                CartCommand::RemoveProduct(LineItemUuid::new("domain")),
                CartCommand::ChangeVariant(
                    LineItemUuid::new("plan"),
                    VariantId::new("value_bundle-2y"),
                ),
                CartCommand::RemoveCoupon,
                CartCommand::ApplyCoupon("save10".to_string()),
            ]
        );

        Ok(())
    }

    #[test]
    fn malformed_variant_change_is_rejected() {
        let result = ReviewConfig::try_parse_from(["cart-review", "--variant", "plan"]);

        assert!(result.is_err());
    }

    #[test]
    fn review_options_follow_flags() -> TestResult {
        let config = ReviewConfig::try_parse_from(["cart-review", "--summary"])?;

        assert_eq!(
            config.review_options(),
            ReviewOptions {
                variant_changes_enabled: false,
                is_summary: true,
            }
        );

        Ok(())
    }
}
