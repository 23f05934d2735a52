//! Client types for Data API communication.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`DataClient`]: the high-level client callers hold
//! - [`HttpClient`]: the HTTPS-only transport underneath it
//! - [`RequestOptions`] / [`ScriptTrigger`]: per-request configuration and
//!   script trigger normalization
//! - [`FmError`] / [`NormalizedError`]: the closed failure taxonomy and its
//!   `{code, message[, token]}` wire shape
//! - [`FindResult`] / [`CreateResult`] / [`Record`]: typed response payloads
//!
//! # Control Flow
//!
//! A data operation builds its canonical body through [`RequestOptions`],
//! borrows a session token (authenticating lazily), dispatches through
//! [`HttpClient`], and routes every failure through the normalizer so the
//! caller always receives either a typed payload or an [`FmError`].

mod data_client;
pub(crate) mod errors;
pub(crate) mod http_client;
mod request;
pub(crate) mod response;

pub use data_client::DataClient;
pub use errors::{
    FmError, FmMessage, NormalizedError, CONNECTION_ERROR_CODE, MISSING_DATA_ERROR_CODE,
    PROTOCOL_ERROR_CODE, TIMEOUT_ERROR_CODE, TOKEN_EXPIRED_CODE,
};
pub use http_client::{FmMethod, HttpClient, SDK_VERSION};
pub use request::{RequestOptions, ScriptPhase, ScriptTrigger};
pub use response::{CreateResult, EmptyResult, FindResult, FmResponse, Record};
