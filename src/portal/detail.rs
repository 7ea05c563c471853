use super::PortalClient;
use crate::collector::DetailFetcher;
use crate::error::{Error, Result};
use crate::types::{DetailRecord, Identifier, Token};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Form field carrying the vacancy identifier
const ID_FIELD: &str = "id";

impl PortalClient {
    /// Fetch one vacancy's detail record
    ///
    /// Sends `<token_field>=<token>&id=<identifier>` with the token cookie and
    /// decodes whatever body comes back. The HTTP status is not inspected; a
    /// non-2xx response with a JSON object body still counts as a record.
    ///
    /// # Errors
    /// - `Error::Network` on transport failure
    /// - `Error::Serialization` if the body is not JSON
    /// - `Error::UnexpectedShape` if the JSON is not an object (including `null`)
    pub async fn fetch_detail(
        &self,
        identifier: &Identifier,
        token: &Token,
    ) -> Result<DetailRecord> {
        let response = self
            .post_form(&self.detail_url, token, &[(ID_FIELD, identifier.as_str())])
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(
                identifier = %identifier,
                status = status.as_u16(),
                "detail request returned non-success status"
            );
        }

        let body = response.bytes().await?;
        decode_record(&body)
    }
}

#[async_trait::async_trait]
impl DetailFetcher for PortalClient {
    async fn fetch_detail(&self, identifier: &Identifier, token: &Token) -> Result<DetailRecord> {
        PortalClient::fetch_detail(self, identifier, token).await
    }
}

/// Decode a response body into a flat key-value record
pub(crate) fn decode_record(body: &[u8]) -> Result<DetailRecord> {
    match first_json_value::<Value>(body)? {
        Value::Object(record) => Ok(record),
        other => Err(Error::UnexpectedShape(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decode the first JSON value in `body`, ignoring whatever follows it
///
/// The portal sometimes appends debug output after the JSON document.
///
/// # Errors
/// - `Error::Serialization` if the leading bytes are not valid JSON
/// - `Error::UnexpectedShape` if the body is empty or whitespace only
pub(crate) fn first_json_value<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    match serde_json::Deserializer::from_slice(body).into_iter::<T>().next() {
        Some(value) => Ok(value?),
        None => Err(Error::UnexpectedShape("empty response body".to_string())),
    }
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
