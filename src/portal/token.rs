use super::PortalClient;
use crate::error::{Error, Result};
use crate::types::Token;
use scraper::{Html, Selector};
use tracing::{debug, info};

impl PortalClient {
    /// Fetch the job page and pull the anti-forgery token out of it
    ///
    /// Performs exactly one GET; no retries.
    ///
    /// # Errors
    /// - `Error::Network` if the request or body read fails
    /// - `Error::TokenNotFound` if the page has no `input[name=<token_field>]` with a value
    pub async fn fetch_token(&self) -> Result<Token> {
        debug!(url = %self.job_url, "fetching token page");

        let response = self.http.get(self.job_url.clone()).send().await?;
        let html = response.text().await?;

        let token = extract_token(&html, &self.config.token_field).ok_or_else(|| {
            Error::TokenNotFound {
                field: self.config.token_field.clone(),
            }
        })?;

        info!(token_len = token.as_str().len(), "anti-forgery token acquired");
        Ok(token)
    }
}

/// Extract the `value` attribute of the first `input[name=<field>]` in `html`
///
/// Returns `None` when the input or its `value` attribute is missing. An input
/// with an empty value yields an empty token.
pub fn extract_token(html: &str, field: &str) -> Option<Token> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!(r#"input[name="{}"]"#, field)).ok()?;

    document
        .select(&selector)
        .next()?
        .value()
        .attr("value")
        .map(Token::new)
}
