//! entsearch - free-text filtering over JSON entity lists
//!
//! A single-binary CLI for loading entities from a file or REST endpoint and
//! filtering them with comma-separated, negatable search terms.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use entity_search::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "entsearch=debug,entity_search=debug,warn"
    } else {
        "entsearch=info,entity_search=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    cli.run().await
}
