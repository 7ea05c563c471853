//! The harvest run: token → (listing refresh) → identifiers → concurrent details → CSV.
//!
//! Each stage reports its own failures and degrades instead of aborting:
//! a missing token becomes an empty token, a missing identifier column becomes
//! an empty identifier list, failed detail fetches are simply absent from the
//! output, and an empty result set skips the details write. Only invalid
//! configuration stops a run before it starts.

use crate::collector::{self, ConcurrencyLimit};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::identifiers;
use crate::portal::PortalClient;
use crate::types::{Collection, DetailRecord, Identifier, RunSummary, Token};
use crate::writer;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tracing::{error, info, warn};

/// Runs one complete harvest against the configured portal
pub struct Harvester {
    config: Config,
    portal: Arc<PortalClient>,
}

impl Harvester {
    /// Validate `config` and build the portal client
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be created
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let portal = PortalClient::new(config.portal.clone(), config.fetch.request_timeout)?;
        Ok(Self {
            config,
            portal: Arc::new(portal),
        })
    }

    /// Configuration this harvester runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute the full pipeline once
    ///
    /// There is no resumability: a partial run has to be restarted from the top.
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let token = self.acquire_token().await;
        summary.token_acquired = !token.is_empty();

        if self.config.input.refresh_listing {
            match self.refresh_listing(&token).await {
                Ok(rows) => summary.listing_rows = rows,
                Err(e) => error!(error = %e, "listing refresh failed, using existing listing file"),
            }
        }

        let identifiers = self.load_identifiers().await;
        summary.identifiers_loaded = identifiers.len();

        let collection = self.collect_details(identifiers, token).await;
        summary.launched = collection.launched;
        summary.fetched = collection.records.len();
        summary.failed = collection.failures.len();

        match self.write_details(collection.records).await {
            Ok(()) => summary.details_written = true,
            Err(e) => error!(error = %e, "details not written"),
        }

        info!(
            launched = summary.launched,
            fetched = summary.fetched,
            failed = summary.failed,
            written = summary.details_written,
            "harvest finished"
        );
        Ok(summary)
    }

    /// Fetch the anti-forgery token, falling back to an empty token on failure
    pub async fn acquire_token(&self) -> Token {
        match self.portal.fetch_token().await {
            Ok(token) => {
                if token.is_empty() {
                    warn!("portal returned an empty token");
                }
                token
            }
            Err(e) => {
                error!(error = %e, "failed to acquire token, continuing without one");
                Token::default()
            }
        }
    }

    /// Download the bulk listing and write it to the listing path
    ///
    /// Returns the number of listing rows written.
    pub async fn refresh_listing(&self, token: &Token) -> Result<usize> {
        let listing = self.portal.fetch_listing(token).await?;
        let rows = listing.len();
        let path = self.config.input.listing_path.clone();
        self.write_blocking(listing, path).await?;
        Ok(rows)
    }

    /// Read identifiers from the listing file
    ///
    /// Never fails: an unreadable file or a missing identifier column is
    /// reported and yields an empty list. When `skip_first_identifier` is set,
    /// the first identifier is dropped.
    pub async fn load_identifiers(&self) -> Vec<Identifier> {
        let path = self.config.input.listing_path.clone();
        let column = self.config.input.id_column.clone();

        let loaded = spawn_blocking(move || identifiers::load_identifiers(&path, &column))
            .await
            .map_err(|e| Error::Other(format!("identifier loading task panicked: {}", e)))
            .and_then(|result| result);

        let identifiers = match loaded {
            Ok(identifiers) => identifiers,
            Err(e) => {
                error!(error = %e, "no identifiers loaded");
                return Vec::new();
            }
        };

        if self.config.input.skip_first_identifier {
            identifiers::skip_first(identifiers)
        } else {
            identifiers
        }
    }

    /// Fetch every identifier's detail concurrently
    pub async fn collect_details(&self, identifiers: Vec<Identifier>, token: Token) -> Collection {
        let limit = ConcurrencyLimit::from(self.config.fetch.max_concurrent_fetches);
        collector::collect(self.portal.clone(), identifiers, Arc::new(token), limit).await
    }

    /// Write collected records to the details path
    ///
    /// # Errors
    /// `Error::EmptyRecordSet` when nothing was collected; I/O and CSV errors otherwise
    pub async fn write_details(&self, records: Vec<DetailRecord>) -> Result<()> {
        let path = self.config.output.details_path.clone();
        self.write_blocking(records, path).await
    }

    async fn write_blocking(&self, records: Vec<DetailRecord>, path: PathBuf) -> Result<()> {
        let mode = self.config.output.header_mode;
        spawn_blocking(move || writer::write_records(&records, &path, mode))
            .await
            .map_err(|e| Error::Other(format!("CSV writer task panicked: {}", e)))?
    }
}
