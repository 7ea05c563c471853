//! Core types for vacancy-dl

use serde::{Deserialize, Serialize};
use std::fmt;

/// One vacancy detail as returned by the portal
///
/// The shape is owned by the remote service; any JSON value may appear under any key.
pub type DetailRecord = serde_json::Map<String, serde_json::Value>;

/// Anti-forgery token scraped from the portal's job page
///
/// Sent both as a form field and as a cookie on every POST. An empty token is
/// what a failed acquisition leaves behind.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no token was obtained
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token")
            .field(&format_args!("<{} chars>", self.0.len()))
            .finish()
    }
}

/// Opaque key naming one remote vacancy
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    /// Create a new Identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Result of a single detail fetch, as delivered through the fan-in channel
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The portal returned a JSON object for this identifier
    Fetched {
        /// Identifier that was requested
        identifier: Identifier,
        /// Decoded detail record
        record: DetailRecord,
    },
    /// The request or the decode failed
    Failed {
        /// Identifier that was requested
        identifier: Identifier,
        /// Human-readable cause
        error: String,
    },
}

impl FetchOutcome {
    /// Identifier this outcome belongs to
    pub fn identifier(&self) -> &Identifier {
        match self {
            FetchOutcome::Fetched { identifier, .. } | FetchOutcome::Failed { identifier, .. } => {
                identifier
            }
        }
    }
}

/// Aggregated output of one collector run
///
/// `records` arrive in completion order, not input order.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Number of fetch units launched
    pub launched: usize,
    /// Successfully decoded records
    pub records: Vec<DetailRecord>,
    /// Identifiers whose fetch failed, with the cause
    pub failures: Vec<(Identifier, String)>,
}

impl Collection {
    /// Units that reported neither success nor failure (panicked tasks)
    pub fn unreported(&self) -> usize {
        self.launched
            .saturating_sub(self.records.len() + self.failures.len())
    }

    /// Fold one outcome into the collection
    pub(crate) fn push(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched { record, .. } => self.records.push(record),
            FetchOutcome::Failed { identifier, error } => self.failures.push((identifier, error)),
        }
    }
}

/// Counts reported by a full pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Whether a non-empty token was obtained
    pub token_acquired: bool,
    /// Rows written to the listing file (0 unless the listing was refreshed)
    pub listing_rows: usize,
    /// Identifiers queued for fetching, counted after the optional first-row skip
    pub identifiers_loaded: usize,
    /// Detail fetches launched
    pub launched: usize,
    /// Detail records collected
    pub fetched: usize,
    /// Detail fetches that failed
    pub failed: usize,
    /// Whether the details file was written
    pub details_written: bool,
}
