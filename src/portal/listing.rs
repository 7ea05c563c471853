use super::PortalClient;
use super::detail::{first_json_value, json_kind};
use crate::error::{Error, Result};
use crate::types::{DetailRecord, Token};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

/// Form field selecting which company's vacancies to list
const COMPANY_FIELD: &str = "company";

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    result: Vec<Value>,
}

impl PortalClient {
    /// Fetch the bulk vacancy listing (`data.result` of the listing endpoint)
    ///
    /// Entries that are not JSON objects are skipped with a warning.
    ///
    /// # Errors
    /// - `Error::Network` on transport failure
    /// - `Error::Serialization` if the body is not JSON or lacks the `data` envelope
    pub async fn fetch_listing(&self, token: &Token) -> Result<Vec<DetailRecord>> {
        let response = self
            .post_form(
                &self.load_record_url,
                token,
                &[(COMPANY_FIELD, self.config.company.as_str())],
            )
            .await?;

        let body = response.bytes().await?;
        let listing = decode_listing(&body)?;

        info!(count = listing.len(), company = %self.config.company, "vacancy listing fetched");
        Ok(listing)
    }
}

/// Decode the listing envelope into its object entries
pub(crate) fn decode_listing(body: &[u8]) -> Result<Vec<DetailRecord>> {
    let envelope: ListingEnvelope = first_json_value(body)?;

    let total = envelope.data.result.len();
    let records: Vec<DetailRecord> = envelope
        .data
        .result
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(record) => Some(record),
            other => {
                warn!(index, kind = json_kind(&other), "skipping non-object listing entry");
                None
            }
        })
        .collect();

    if total > 0 && records.is_empty() {
        return Err(Error::UnexpectedShape(format!(
            "none of the {} listing entries is a JSON object",
            total
        )));
    }

    Ok(records)
}
