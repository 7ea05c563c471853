//! # vacancy-dl
//!
//! Harvests vacancy listings and per-vacancy detail records from a recruitment
//! portal that guards its API with a session-bound anti-forgery token, and
//! writes the results to CSV.
//!
//! ## Pipeline
//!
//! 1. [`portal::PortalClient::fetch_token`] scrapes the token from the job page
//! 2. optionally, [`portal::PortalClient::fetch_listing`] refreshes the listing CSV
//! 3. [`identifiers::load_identifiers`] reads vacancy identifiers from the listing CSV
//! 4. [`collector::collect`] fetches every detail concurrently, tolerating failures
//! 5. [`writer::write_records`] writes the collected records as CSV
//!
//! [`Harvester`] wires these together.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vacancy_dl::{Config, Harvester};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.fetch.max_concurrent_fetches = Some(16);
//!
//!     let summary = Harvester::new(config)?.run().await?;
//!     println!("{} of {} details fetched", summary.fetched, summary.launched);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Concurrent detail collection
pub mod collector;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Identifier loading from the listing CSV
pub mod identifiers;
/// Harvest pipeline
pub mod pipeline;
/// Portal HTTP client
pub mod portal;
/// Core types
pub mod types;
/// CSV output
pub mod writer;

// Re-export commonly used types
pub use collector::{ConcurrencyLimit, DetailFetcher};
pub use config::{Config, FetchConfig, HeaderMode, InputConfig, OutputConfig, PortalConfig};
pub use error::{Error, Result};
pub use pipeline::Harvester;
pub use portal::PortalClient;
pub use types::{Collection, DetailRecord, FetchOutcome, Identifier, RunSummary, Token};
