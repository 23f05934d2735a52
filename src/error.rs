//! Configuration error types for the FileMaker Data API client.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use fmdata::{AccountName, ConfigError};
//!
//! let result = AccountName::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccountName)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
///
/// Each variant provides a clear, actionable message describing what was
/// missing or invalid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The server URL cannot be empty.
    #[error("Server URL cannot be empty. Please provide the FileMaker Server address, e.g. 'https://fms.example.com'.")]
    EmptyServerUrl,

    /// The database name cannot be empty.
    #[error("Database name cannot be empty. Please provide the name of a hosted FileMaker database.")]
    EmptyDatabaseName,

    /// The account name cannot be empty.
    #[error("Account name cannot be empty. Please provide a FileMaker account with fmrest extended privileges.")]
    EmptyAccountName,

    /// The account password cannot be empty.
    #[error("Password cannot be empty. Please provide the password for the configured account.")]
    EmptyPassword,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
