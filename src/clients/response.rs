//! Typed response shapes for the Data API.
//!
//! Every successful Data API body has the envelope
//! `{"response": {...}, "messages": [{"code": "0", "message": "OK"}]}`;
//! [`FmResponse`] models the envelope and the payload types model what sits
//! inside `response` for each operation.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::clients::errors::FmMessage;

/// The envelope wrapping every Data API response body.
#[derive(Clone, Debug, Deserialize)]
pub struct FmResponse<T> {
    /// The operation-specific payload.
    pub response: T,
    /// Vendor status messages; `code == "0"` on success.
    #[serde(default)]
    pub messages: Vec<FmMessage>,
}

/// Payload of a session-creation response.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthPayload {
    /// The opaque session token to present on subsequent requests.
    pub token: String,
}

/// Result of a successful record creation.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateResult {
    /// The id of the newly created record.
    pub record_id: String,
    /// The record's modification counter, `"0"` for a fresh record.
    #[serde(default)]
    pub mod_id: String,
}

/// One record as returned by a find.
///
/// `field_data` holds the layout's fields; `portal_data` holds related
/// records keyed by portal name. Both are kept as raw JSON maps since the
/// shape is layout-defined.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The record id.
    pub record_id: String,
    /// The record's modification counter.
    #[serde(default)]
    pub mod_id: String,
    /// Field-name to value mapping for the layout's fields.
    #[serde(default)]
    pub field_data: Map<String, Value>,
    /// Portal-name to related-record mapping.
    #[serde(default)]
    pub portal_data: Map<String, Value>,
}

/// Payload of a find response.
#[derive(Clone, Debug, Deserialize)]
pub struct FindResult {
    /// The matching records, in server order.
    #[serde(default)]
    pub data: Vec<Record>,
}

/// Payload of operations that return an empty `response` object, such as
/// delete and set-globals.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmptyResult {}

/// Parses a raw transport outcome into the typed envelope.
///
/// Non-2xx statuses and 2xx bodies that do not parse both route through the
/// error normalizer, so the caller sees either a typed payload or an
/// [`FmError`], never a half-parsed body.
pub(crate) fn parse_response<T: serde::de::DeserializeOwned>(
    raw: &crate::clients::http_client::RawResponse,
) -> Result<FmResponse<T>, crate::clients::errors::FmError> {
    if !raw.is_success() {
        return Err(crate::clients::errors::classify_failure(
            raw.status, &raw.body,
        ));
    }
    serde_json::from_str(&raw.body).map_err(|e| crate::clients::errors::FmError::Protocol {
        message: format!("Could not parse the server response as a Data API body: {e}"),
    })
}
