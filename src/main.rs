//! `vacancy-dl [config.json]`: run one harvest.
//!
//! Without an argument the built-in portal defaults are used. Log verbosity is
//! controlled through `RUST_LOG` (default: `info`).

use tracing_subscriber::EnvFilter;
use vacancy_dl::{Config, Harvester};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    let harvester = Harvester::new(config)?;
    tracing::info!(
        listing = %harvester.config().input.listing_path.display(),
        details = %harvester.config().output.details_path.display(),
        "starting harvest"
    );
    let summary = harvester.run().await?;
    tracing::info!(summary = ?summary, "done");

    Ok(())
}
