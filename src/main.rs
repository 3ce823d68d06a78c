//! Cart Review CLI
//!
//! Loads a cart fixture into an in-memory cart service, submits the commands
//! given on the command line and prints the resulting order review.

use std::{io, process};

use thiserror::Error;
use tracing::{info, warn};

use cart_review::{
    config::ReviewConfig,
    engine::CartReviewEngine,
    fixtures::{Fixture, FixtureError},
    observability::{ObservabilityError, init_subscriber},
    review::table::{RenderError, write_review},
    service::CartServiceError,
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("failed to load cart: {0}")]
    Service(#[from] CartServiceError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[tokio::main]
pub async fn main() {
    let config = ReviewConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = run(&config).await {
        #[expect(
            clippy::print_stderr,
            reason = "errors may occur before logging is initialised"
        )]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}

async fn run(config: &ReviewConfig) -> Result<(), CliError> {
    init_subscriber(&config.logging)?;

    let (service, classifier) =
        Fixture::with_base_path(&config.fixtures).cart_service(&config.cart, &config.catalog)?;

    let engine = CartReviewEngine::load(service, classifier, config.review_options()).await?;

    for command in config.commands() {
        let name = command.name();

        match engine.submit(command).await {
            Ok(()) => info!(command = name, "command applied"),
            Err(error) => warn!(command = name, %error, "command failed"),
        }
    }

    let site = engine.site_summary(config.site.context().as_ref());

    write_review(
        io::stdout().lock(),
        &engine.review(),
        site.as_ref(),
        engine.coupon_affordance(),
    )?;

    if let Some(failure) = engine.inline_failure() {
        warn!(affordance = ?failure.affordance, kind = ?failure.kind, "last command failed");
    }

    Ok(())
}
