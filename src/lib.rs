//! # FileMaker Data API Rust Client
//!
//! An async Rust client for the FileMaker Data API, providing type-safe
//! configuration, managed session lifecycle, and normalized error handling
//! for record operations against hosted FileMaker databases.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`FmConfig`] and [`FmConfigBuilder`]
//! - Validated newtypes for server addresses and credentials
//! - Managed session lifecycle: lazy acquisition, reuse, invalidation on
//!   expiry, single-flight re-authentication under concurrency
//! - Record operations: create, find, delete, and session globals, with
//!   triggered-script and per-request timeout support
//! - One normalized error shape for every failure mode
//! - Pure response extractors for ids, field data, typed values, and
//!   container downloads
//!
//! ## Quick Start
//!
//! ```rust
//! use fmdata::FmConfig;
//!
//! let config = FmConfig::builder()
//!     .server("https://fms.example.com")
//!     .database("Heroes")
//!     .user("admin")
//!     .password("secret")
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making Data Calls
//!
//! ```rust,ignore
//! use fmdata::{DataClient, FmConfig, RequestOptions, ScriptPhase, ScriptTrigger};
//! use serde_json::json;
//!
//! let client = DataClient::new(config);
//!
//! // Create a record; the session opens lazily on first use.
//! let created = client.create("Heroes", json!({"name": "Yoda"}), None).await?;
//!
//! // Find with paging and a triggered script.
//! let options = RequestOptions::new()
//!     .limit(2)
//!     .scripts(vec![ScriptTrigger::new("Log Search", ScriptPhase::Default, None)]);
//! let found = client.find("Heroes", json!({"name": "Yoda"}), Some(options)).await?;
//!
//! // Project the response.
//! let ids = fmdata::extract::record_id(&found.data);
//!
//! client.delete("Heroes", &created.record_id, None).await?;
//! client.logout().await?;
//! ```
//!
//! ## Error Handling
//!
//! Every failure (vendor error codes, non-JSON bodies, refused connections,
//! elapsed timeouts, expired tokens, missing local arguments) surfaces as
//! one [`FmError`] variant and maps deterministically onto the
//! `{code, message[, token]}` shape via [`FmError::normalized`]. A request
//! that fails because the token expired clears the session before the error
//! is returned; the error's `token` field carries the emptied value and the
//! next operation re-authenticates.
//!
//! ## Design Principles
//!
//! - **No global state**: each [`DataClient`] owns its session; nothing is
//!   process-wide
//! - **Fail-fast validation**: configuration newtypes validate on
//!   construction; missing local arguments are rejected before any network
//!   call
//! - **HTTPS only**: non-HTTPS or malformed server addresses are refused as
//!   structured errors, never silently attempted over plain HTTP; plain HTTP
//!   requires the explicit [`FmConfigBuilder::allow_insecure_http`] opt-in
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod extract;

// Re-export public types at crate root for convenience
pub use auth::{Session, SessionManager};
pub use config::{AccountName, DatabaseName, FmConfig, FmConfigBuilder, Password, ServerUrl};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    CreateResult, DataClient, EmptyResult, FindResult, FmError, FmMessage, FmResponse, HttpClient,
    NormalizedError, Record, RequestOptions, ScriptPhase, ScriptTrigger,
};
