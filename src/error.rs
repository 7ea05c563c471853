//! Error types for vacancy-dl
//!
//! Errors fall into three groups:
//! - transport failures (HTTP, file I/O)
//! - parse failures (HTML token extraction, JSON decoding, CSV decoding)
//! - data failures (missing identifier column, nothing to write)
//!
//! Per-vacancy failures inside the collector never escape as an `Error`; they are
//! recorded in [`Collection::failures`](crate::types::Collection) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vacancy-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vacancy-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "portal.base_url")
        key: Option<String>,
    },

    /// Network error (connect, send, or body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON decoding error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The anti-forgery token input was not present in the page
    #[error("token input '{field}' not found in page")]
    TokenNotFound {
        /// Name of the hidden input that should carry the token
        field: String,
    },

    /// The identifier column is not present in the listing header
    #[error("column not found: {column}")]
    ColumnNotFound {
        /// The column name that was looked up
        column: String,
    },

    /// Refused to write a tabular file without any records to derive a header from
    #[error("no records to write to {}", path.display())]
    EmptyRecordSet {
        /// Destination that was left untouched
        path: PathBuf,
    },

    /// Response decoded as JSON but not in the expected shape
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Whether this error came from the transport layer rather than from the data
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Io(_))
    }
}
