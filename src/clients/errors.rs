//! Error normalization for the FileMaker Data API client.
//!
//! Every failure a caller can observe (a vendor-reported error, a non-JSON
//! body, a refused connection, an expired token, a locally rejected argument)
//! is funneled through this module and surfaces as one [`FmError`] variant.
//! There is no third outcome: public operations resolve to either a domain
//! value or an `FmError`, never a raw [`reqwest::Error`].
//!
//! # Example
//!
//! ```rust,ignore
//! use fmdata::FmError;
//!
//! match client.delete("Heroes", record_id, None).await {
//!     Ok(response) => println!("Deleted: {response:?}"),
//!     Err(FmError::Api { code, message }) => {
//!         println!("Server error {code}: {message}");
//!     }
//!     Err(FmError::TokenExpired { token, .. }) => {
//!         assert!(token.is_empty()); // session was invalidated first
//!     }
//!     Err(other) => println!("{} {}", other.code(), other.message()),
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Synthetic code for responses whose body is not valid JSON.
///
/// Deliberately outside the range of genuine FileMaker error codes so a
/// caller can tell a mangled gateway response from a vendor-reported error.
pub const PROTOCOL_ERROR_CODE: &str = "1630";

/// Synthetic code for connection-level failures, including non-HTTPS or
/// malformed server addresses that are rejected before any network attempt.
pub const CONNECTION_ERROR_CODE: &str = "1631";

/// Synthetic code for a per-request timeout that elapsed before a response.
pub const TIMEOUT_ERROR_CODE: &str = "1632";

/// FileMaker error code reported when the Data API token is invalid or
/// expired.
pub const TOKEN_EXPIRED_CODE: &str = "952";

/// FileMaker error code for "requested data is missing", used for local
/// validation failures such as a delete with no record id.
pub const MISSING_DATA_ERROR_CODE: &str = "10";

/// A single entry from the `messages` array of a Data API response.
///
/// FileMaker reports `{"code": "0", "message": "OK"}` on success and a
/// vendor error code otherwise.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct FmMessage {
    /// The vendor error code, `"0"` on success.
    pub code: String,
    /// The human-readable message accompanying the code.
    pub message: String,
}

/// The wire shape every surfaced failure maps to.
///
/// Always carries `code` and `message`; carries `token` only when the
/// triggering failure was token-expiry related, in which case the value is
/// the now-cleared (empty) token.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct NormalizedError {
    /// Vendor or synthetic error code.
    pub code: String,
    /// Human-readable description of the failure.
    pub message: String,
    /// Present only for token-expiry failures; always the emptied token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Unified error type for all Data API operations.
///
/// This is a closed taxonomy: every failure path in the crate terminates in
/// exactly one of these variants, and each maps deterministically to the
/// `{code, message[, token]}` wire shape via [`FmError::normalized`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FmError {
    /// The server reported a vendor error code in its `messages` array.
    #[error("FileMaker Data API error {code}: {message}")]
    Api {
        /// The vendor error code (e.g. `"401"` for no matching records).
        code: String,
        /// The vendor error message.
        message: String,
    },

    /// The session token was rejected as invalid or expired (code 952).
    ///
    /// Constructed only after the session has been invalidated; `token`
    /// therefore always holds the emptied value, proving the clearing
    /// happened before the caller observed the error.
    #[error("Invalid FileMaker Data API token: {message}")]
    TokenExpired {
        /// The vendor error message.
        message: String,
        /// The session token after invalidation; always empty.
        token: String,
    },

    /// The server responded with something that is not a Data API JSON body.
    #[error("Invalid response from server: {message}")]
    Protocol {
        /// Description of the malformed response.
        message: String,
    },

    /// The request never produced a response: non-HTTPS or malformed target,
    /// refused connection, or an elapsed per-request timeout.
    #[error("Connection failure: {message}")]
    Connection {
        /// [`CONNECTION_ERROR_CODE`] or [`TIMEOUT_ERROR_CODE`].
        code: String,
        /// Description of the transport failure.
        message: String,
    },

    /// A required local argument was missing; raised before any network call.
    #[error("Invalid request: {message}")]
    Validation {
        /// Description of the missing argument.
        message: String,
    },
}

impl FmError {
    /// Returns the vendor or synthetic code for this error.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Api { code, .. } | Self::Connection { code, .. } => code,
            Self::TokenExpired { .. } => TOKEN_EXPIRED_CODE,
            Self::Protocol { .. } => PROTOCOL_ERROR_CODE,
            Self::Validation { .. } => MISSING_DATA_ERROR_CODE,
        }
    }

    /// Returns the human-readable message for this error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Api { message, .. }
            | Self::TokenExpired { message, .. }
            | Self::Protocol { message }
            | Self::Connection { message, .. }
            | Self::Validation { message } => message,
        }
    }

    /// Returns the emptied token for token-expiry errors, `None` otherwise.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::TokenExpired { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Returns `true` if this error reports an invalid or expired token.
    #[must_use]
    pub const fn is_token_expired(&self) -> bool {
        matches!(self, Self::TokenExpired { .. })
    }

    /// Projects this error onto the `{code, message[, token]}` wire shape.
    #[must_use]
    pub fn normalized(&self) -> NormalizedError {
        NormalizedError {
            code: self.code().to_string(),
            message: self.message().to_string(),
            token: self.token().map(String::from),
        }
    }
}

/// Extracts the first vendor message from a parsed Data API body, if present.
fn first_message(body: &serde_json::Value) -> Option<FmMessage> {
    let entry = body.get("messages")?.as_array()?.first()?;
    serde_json::from_value(entry.clone()).ok()
}

/// Classifies the outcome of a single transport attempt that did not parse
/// into the expected success shape.
///
/// The state machine, in order:
/// 1. JSON body with a `messages` entry carrying code 952 → [`FmError::TokenExpired`]
///    (the caller invalidates the session before surfacing it).
/// 2. JSON body with any other `messages` entry → [`FmError::Api`] with the
///    vendor code and message.
/// 3. Anything else (plain-text or HTML body, JSON of the wrong shape) →
///    [`FmError::Protocol`] with the synthetic non-JSON code.
#[must_use]
pub(crate) fn classify_failure(status: u16, body: &str) -> FmError {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = first_message(&value) {
            if message.code == TOKEN_EXPIRED_CODE {
                return FmError::TokenExpired {
                    message: message.message,
                    token: String::new(),
                };
            }
            return FmError::Api {
                code: message.code,
                message: message.message,
            };
        }
    }
    FmError::Protocol {
        message: format!("Received a non-JSON response with status {status}"),
    }
}

/// Converts a transport-level [`reqwest::Error`] into the closed taxonomy.
///
/// Timeouts get their own synthetic code so callers can distinguish an
/// elapsed deadline from a refused connection; everything else maps to the
/// generic connection code. The raw error never escapes this boundary.
#[must_use]
pub(crate) fn classify_transport(error: &reqwest::Error) -> FmError {
    if error.is_timeout() {
        FmError::Connection {
            code: TIMEOUT_ERROR_CODE.to_string(),
            message: "The request timed out before the server responded".to_string(),
        }
    } else {
        FmError::Connection {
            code: CONNECTION_ERROR_CODE.to_string(),
            message: format!("Unable to reach the FileMaker Server: {error}"),
        }
    }
}
