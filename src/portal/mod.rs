//! HTTP access to the recruitment portal.
//!
//! The portal guards every POST with an anti-forgery token that must be echoed
//! twice: once as a form field and once as a cookie. [`PortalClient`] owns the
//! shared `reqwest::Client` and the resolved endpoint URLs; the individual
//! requests live in focused submodules:
//! - [`token`]: scrape the token from the job page
//! - [`listing`]: bulk listing of every vacancy
//! - [`detail`]: one vacancy's detail record

use crate::config::PortalConfig;
use crate::error::{Error, Result};
use crate::types::Token;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Per-vacancy detail request
pub mod detail;
/// Bulk vacancy listing request
pub mod listing;
/// Anti-forgery token acquisition
pub mod token;

pub use token::extract_token;

/// Client for the portal's token page, listing endpoint, and detail endpoint
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` is already
/// reference-counted and safe to use from many tasks at once.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    config: PortalConfig,
    job_url: Url,
    load_record_url: Url,
    detail_url: Url,
}

impl PortalClient {
    /// Create a portal client
    ///
    /// # Arguments
    /// * `config` - Portal endpoints and token naming
    /// * `request_timeout` - Optional per-request timeout (None = no timeout)
    ///
    /// # Errors
    /// Returns error if an endpoint URL cannot be built or the HTTP client cannot be created
    pub fn new(config: PortalConfig, request_timeout: Option<Duration>) -> Result<Self> {
        let job_url = config.job_url()?;
        let load_record_url = config.load_record_url()?;
        let detail_url = config.detail_url()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let http = builder
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        debug!(base_url = %config.base_url, "portal client created");

        Ok(Self {
            http,
            config,
            job_url,
            load_record_url,
            detail_url,
        })
    }

    /// `Cookie` header value carrying the token
    fn cookie_header(&self, token: &Token) -> String {
        format!("{}={}", self.config.cookie_name, token.as_str())
    }

    /// POST a form to `url` with the token in both the body and the cookie
    ///
    /// The token field is always sent first, followed by `fields`. The response
    /// status is not inspected here.
    async fn post_form(
        &self,
        url: &Url,
        token: &Token,
        fields: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(fields.len() + 1);
        form.push((self.config.token_field.as_str(), token.as_str()));
        form.extend_from_slice(fields);

        let response = self
            .http
            .post(url.clone())
            .header(reqwest::header::COOKIE, self.cookie_header(token))
            .form(&form)
            .send()
            .await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests;
