//! Terminal rendering of an order review.

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    coupon::{CouponAffordance, CouponStatus},
    review::{OrderReview, ReviewLineItem, site::SiteSummary},
    rules::{DeletionVeto, VariantLock},
};

/// Errors that can occur when writing a review table.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("failed to write review: {0}")]
    Io(#[from] io::Error),
}

/// Write the review as a table followed by its totals.
///
/// # Errors
///
/// Returns a [`RenderError`] if the output cannot be written.
pub fn write_review(
    mut out: impl io::Write,
    review: &OrderReview,
    site: Option<&SiteSummary>,
    coupon: CouponAffordance,
) -> Result<(), RenderError> {
    match site {
        Some(SiteSummary::Site { domain }) => writeln!(out, "Site: {domain}")?,
        Some(SiteSummary::Upgrade { site_name }) => writeln!(out, "Upgrade: {site_name}")?,
        None => {}
    }

    let mut builder = Builder::default();

    builder.push_record(["Item", "Slug", "Price", "Remove", "Variants"]);

    for item in &review.line_items {
        push_product_row(&mut builder, item);
    }

    let adjustment_start = review.line_items.len() + 1;

    if let Some(coupon) = &review.adjustments.coupon {
        builder.push_record([
            format!("Coupon: {}", coupon.code),
            String::new(),
            coupon.amount.to_string(),
            if review.coupon_deletable { "yes" } else { "" }.to_string(),
            String::new(),
        ]);
    }

    if let Some(credits) = &review.adjustments.credits {
        builder.push_record([
            "Credits".to_string(),
            String::new(),
            credits.amount.to_string(),
            String::new(),
            String::new(),
        ]);
    }

    let has_adjustments =
        review.adjustments.coupon.is_some() || review.adjustments.credits.is_some();

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    if has_adjustments && adjustment_start > 1 {
        theme.insert_horizontal_line(adjustment_start, separator);
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "  Subtotal: {}", review.subtotal)?;
    writeln!(out, "  Total:    {}", review.total)?;

    if let Some(line) = coupon_line(coupon) {
        writeln!(out, "  {line}")?;
    }

    Ok(())
}

fn push_product_row(builder: &mut Builder, item: &ReviewLineItem) {
    builder.push_record([
        item.product_name.clone(),
        item.product_slug.clone(),
        item.price.to_string(),
        removal_cell(item),
        variant_cell(item.variant_lock),
    ]);
}

fn removal_cell(item: &ReviewLineItem) -> String {
    if item.deletable() {
        return "yes".to_string();
    }

    let reasons: Vec<&str> = item
        .vetoes
        .iter()
        .map(|veto| match veto {
            DeletionVeto::FixedCategory => "fixed",
            DeletionVeto::RequiredByDifm => "needed by DIFM",
            DeletionVeto::RequiredByMarketplace => "needed by add-on",
        })
        .collect();

    format!("no ({})", reasons.join(", "))
}

fn variant_cell(lock: Option<VariantLock>) -> String {
    match lock {
        None => "yes",
        Some(VariantLock::Disabled) => "",
        Some(VariantLock::Renewal) => "no (renewal)",
        Some(VariantLock::FixedByDifm) => "no (DIFM term)",
    }
    .to_string()
}

fn coupon_line(coupon: CouponAffordance) -> Option<&'static str> {
    match coupon {
        CouponAffordance::Hidden => None,
        CouponAffordance::Prompt => Some("Have a coupon? Add a coupon code"),
        CouponAffordance::Field {
            status: CouponStatus::Invalid,
            ..
        } => Some("Coupon code: (invalid)"),
        CouponAffordance::Field {
            status: CouponStatus::Pending,
            ..
        } => Some("Coupon code: (checking)"),
        CouponAffordance::Field { .. } => Some("Coupon code:"),
    }
}
