//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A FileMaker Server base URL.
///
/// This newtype ensures the server address is non-empty and strips any
/// trailing slash so paths can be appended uniformly.
///
/// Scheme enforcement is deliberately deferred to the transport layer: a
/// server configured with `http://` is accepted here but every request to it
/// resolves to a connection-class error rather than being sent over plain
/// HTTP, unless the configuration opted in via
/// [`crate::FmConfigBuilder::allow_insecure_http`]. This keeps
/// misconfiguration observable as a normal, structured failure at call time.
///
/// # Example
///
/// ```rust
/// use fmdata::ServerUrl;
///
/// let server = ServerUrl::new("https://fms.example.com/").unwrap();
/// assert_eq!(server.as_ref(), "https://fms.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerUrl(String);

impl ServerUrl {
    /// Creates a new validated server URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyServerUrl`] if the address is empty.
    pub fn new(server: impl Into<String>) -> Result<Self, ConfigError> {
        let server = server.into();
        if server.is_empty() {
            return Err(ConfigError::EmptyServerUrl);
        }
        Ok(Self(server.trim_end_matches('/').to_string()))
    }

    /// Returns `true` if the server address uses the `https` scheme.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.0.starts_with("https://")
    }
}

impl AsRef<str> for ServerUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name of a hosted FileMaker database.
///
/// Accepts the name with or without the `.fmp12` extension; the extension is
/// stripped so the value can be embedded in Data API paths directly.
///
/// # Example
///
/// ```rust
/// use fmdata::DatabaseName;
///
/// let database = DatabaseName::new("Heroes.fmp12").unwrap();
/// assert_eq!(database.as_ref(), "Heroes");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseName(String);

impl DatabaseName {
    /// Creates a new validated database name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyDatabaseName`] if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let name = name.strip_suffix(".fmp12").unwrap_or(&name).to_string();
        if name.is_empty() {
            return Err(ConfigError::EmptyDatabaseName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for DatabaseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A FileMaker account name used to open Data API sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountName(String);

impl AccountName {
    /// Creates a new validated account name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccountName`] if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyAccountName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A FileMaker account password.
///
/// # Security
///
/// The `Debug` implementation masks the value, displaying `Password(*****)`
/// instead of the actual password, so it cannot leak through logs.
///
/// # Example
///
/// ```rust
/// use fmdata::Password;
///
/// let password = Password::new("hunter2").unwrap();
/// assert_eq!(format!("{:?}", password), "Password(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a new validated password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_strips_trailing_slash() {
        let server = ServerUrl::new("https://fms.example.com/").unwrap();
        assert_eq!(server.as_ref(), "https://fms.example.com");
    }

    #[test]
    fn test_server_url_rejects_empty() {
        assert!(matches!(ServerUrl::new(""), Err(ConfigError::EmptyServerUrl)));
    }

    #[test]
    fn test_server_url_accepts_http_but_flags_it() {
        let server = ServerUrl::new("http://fms.example.com").unwrap();
        assert!(!server.is_https());
    }

    #[test]
    fn test_server_url_is_https() {
        let server = ServerUrl::new("https://fms.example.com").unwrap();
        assert!(server.is_https());
    }

    #[test]
    fn test_database_name_strips_extension() {
        let database = DatabaseName::new("Heroes.fmp12").unwrap();
        assert_eq!(database.as_ref(), "Heroes");
    }

    #[test]
    fn test_database_name_rejects_empty() {
        assert!(matches!(
            DatabaseName::new(""),
            Err(ConfigError::EmptyDatabaseName)
        ));
        assert!(matches!(
            DatabaseName::new(".fmp12"),
            Err(ConfigError::EmptyDatabaseName)
        ));
    }

    #[test]
    fn test_account_name_rejects_empty() {
        assert!(matches!(
            AccountName::new(""),
            Err(ConfigError::EmptyAccountName)
        ));
    }

    #[test]
    fn test_password_debug_is_masked() {
        let password = Password::new("super-secret").unwrap();
        let debug = format!("{password:?}");
        assert_eq!(debug, "Password(*****)");
        assert!(!debug.contains("super-secret"));
    }
}
