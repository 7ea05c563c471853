//! Configuration types for vacancy-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};
use url::Url;

/// Remote portal endpoints and credential naming
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal root (default: "https://rekrutmenbersama2024.fhcibumn.id")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page carrying the anti-forgery token (default: "/job")
    #[serde(default = "default_job_path")]
    pub job_path: String,

    /// Bulk listing endpoint (default: "/job/loadRecord")
    #[serde(default = "default_load_record_path")]
    pub load_record_path: String,

    /// Per-vacancy detail endpoint (default: "/job/get_detail_vac")
    #[serde(default = "default_detail_path")]
    pub detail_path: String,

    /// Name of the hidden input holding the token, also used as the form field
    #[serde(default = "default_token_field")]
    pub token_field: String,

    /// Cookie that must echo the token on every POST
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Company filter sent with the bulk listing request (default: "all")
    #[serde(default = "default_company")]
    pub company: String,

    /// Optional User-Agent header (None = reqwest default)
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            job_path: default_job_path(),
            load_record_path: default_load_record_path(),
            detail_path: default_detail_path(),
            token_field: default_token_field(),
            cookie_name: default_cookie_name(),
            company: default_company(),
            user_agent: None,
        }
    }
}

impl PortalConfig {
    /// URL of the token page
    pub fn job_url(&self) -> Result<Url> {
        self.join(&self.job_path, "portal.job_path")
    }

    /// URL of the bulk listing endpoint
    pub fn load_record_url(&self) -> Result<Url> {
        self.join(&self.load_record_path, "portal.load_record_path")
    }

    /// URL of the per-vacancy detail endpoint
    pub fn detail_url(&self) -> Result<Url> {
        self.join(&self.detail_path, "portal.detail_path")
    }

    fn join(&self, path: &str, key: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid base URL: {}", e), "portal.base_url"))?;
        base.join(path)
            .map_err(|e| Error::config(format!("cannot join '{}': {}", path, e), key))
    }
}

/// Listing input settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Listing CSV that supplies vacancy identifiers (default: "data/all_jobs.csv")
    #[serde(default = "default_listing_path")]
    pub listing_path: PathBuf,

    /// Header name of the identifier column (default: "vacancy_id")
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Drop the first parsed identifier before fetching details (default: true)
    ///
    /// Long-standing behavior of the harvester; the first data row is treated as
    /// a leftover header line. Turn off once the listing source is known to be clean.
    #[serde(default = "default_true")]
    pub skip_first_identifier: bool,

    /// Re-download the bulk listing into `listing_path` before reading it (default: false)
    #[serde(default)]
    pub refresh_listing: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            listing_path: default_listing_path(),
            id_column: default_id_column(),
            skip_first_identifier: true,
            refresh_listing: false,
        }
    }
}

/// How the output header is derived from the collected records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// Keys of the first record only; later records are projected onto them
    FirstRecord,
    /// Union of keys across all records, in first-seen order
    #[default]
    Union,
}

/// Tabular output settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination of the vacancy details (default: "data/details.csv")
    #[serde(default = "default_details_path")]
    pub details_path: PathBuf,

    /// Header derivation strategy (default: union)
    #[serde(default)]
    pub header_mode: HeaderMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            details_path: default_details_path(),
            header_mode: HeaderMode::default(),
        }
    }
}

/// Detail fetch concurrency and timeouts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum simultaneous detail requests (default: 32, None = unbounded)
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: Option<usize>,

    /// Per-request timeout (default: None = client default, no timeout)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
            request_timeout: None,
        }
    }
}

/// Main configuration for [`Harvester`](crate::Harvester)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Portal endpoints and token naming
    #[serde(default)]
    pub portal: PortalConfig,

    /// Listing input
    #[serde(default)]
    pub input: InputConfig,

    /// Details output
    #[serde(default)]
    pub output: OutputConfig,

    /// Fetch concurrency
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Load a configuration from a JSON file and validate it
    ///
    /// Missing fields fall back to their defaults, so `{}` is a valid file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings that would otherwise only fail mid-run
    pub fn validate(&self) -> Result<()> {
        self.portal.job_url()?;
        self.portal.load_record_url()?;
        self.portal.detail_url()?;

        if self.fetch.max_concurrent_fetches == Some(0) {
            return Err(Error::config(
                "max_concurrent_fetches must be at least 1 (use null for unbounded)",
                "fetch.max_concurrent_fetches",
            ));
        }
        if self.portal.token_field.is_empty() {
            return Err(Error::config(
                "token_field must not be empty",
                "portal.token_field",
            ));
        }
        if self.input.id_column.is_empty() {
            return Err(Error::config("id_column must not be empty", "input.id_column"));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://rekrutmenbersama2024.fhcibumn.id".to_string()
}

fn default_job_path() -> String {
    "/job".to_string()
}

fn default_load_record_path() -> String {
    "/job/loadRecord".to_string()
}

fn default_detail_path() -> String {
    "/job/get_detail_vac".to_string()
}

fn default_token_field() -> String {
    "csrf_fhci".to_string()
}

fn default_cookie_name() -> String {
    "csrf_cookie_fhci".to_string()
}

fn default_company() -> String {
    "all".to_string()
}

fn default_listing_path() -> PathBuf {
    PathBuf::from("data/all_jobs.csv")
}

fn default_details_path() -> PathBuf {
    PathBuf::from("data/details.csv")
}

fn default_id_column() -> String {
    "vacancy_id".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_concurrent_fetches() -> Option<usize> {
    Some(32)
}

// Optional Duration serialization helper (whole seconds)
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
