//! Configuration types for the FileMaker Data API client.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`FmConfig`]: The configuration struct holding server address and credentials
//! - [`FmConfigBuilder`]: A builder for constructing [`FmConfig`] instances
//! - [`ServerUrl`]: A validated FileMaker Server address
//! - [`DatabaseName`]: A validated hosted database name
//! - [`AccountName`]: A validated account name
//! - [`Password`]: A validated password with masked debug output
//!
//! # Example
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

mod newtypes;

pub use newtypes::{AccountName, DatabaseName, Password, ServerUrl};

use crate::error::ConfigError;

/// Configuration for a FileMaker Data API client.
///
/// Holds the server address and the credentials used to open Data API
/// sessions. Constructed via [`FmConfig::builder`].
///
/// # Thread Safety
///
/// `FmConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct FmConfig {
    server: ServerUrl,
    database: DatabaseName,
    user: AccountName,
    password: Password,
    user_agent_prefix: Option<String>,
    allow_insecure_http: bool,
}

impl FmConfig {
    /// Creates a new builder for constructing an `FmConfig`.
    #[must_use]
    pub fn builder() -> FmConfigBuilder {
        FmConfigBuilder::new()
    }

    /// Returns the server address.
    #[must_use]
    pub const fn server(&self) -> &ServerUrl {
        &self.server
    }

    /// Returns the database name.
    #[must_use]
    pub const fn database(&self) -> &DatabaseName {
        &self.database
    }

    /// Returns the account name.
    #[must_use]
    pub const fn user(&self) -> &AccountName {
        &self.user
    }

    /// Returns the account password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns `true` if plain-HTTP server addresses were explicitly allowed.
    #[must_use]
    pub const fn allow_insecure_http(&self) -> bool {
        self.allow_insecure_http
    }
}

// Verify FmConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FmConfig>();
};

/// Builder for constructing [`FmConfig`] instances.
///
/// Required fields are `server`, `database`, `user`, and `password`. The
/// `database` setter also accepts the legacy `application` alias used by
/// older configurations.
///
/// # Example
///
/// ```rust
/// use fmdata::FmConfig;
///
/// let config = FmConfig::builder()
///     .server("https://fms.example.com")
///     .application("Heroes")
///     .user("admin")
///     .password("secret")
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct FmConfigBuilder {
    server: Option<String>,
    database: Option<String>,
    user: Option<String>,
    password: Option<String>,
    user_agent_prefix: Option<String>,
    allow_insecure_http: bool,
}

impl FmConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the FileMaker Server address (required).
    #[must_use]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Sets the database name (required).
    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the database name via the legacy `application` alias.
    ///
    /// Equivalent to [`FmConfigBuilder::database`]; kept so configurations
    /// written against the older credential shape keep working.
    #[must_use]
    pub fn application(self, application: impl Into<String>) -> Self {
        self.database(application)
    }

    /// Sets the account name (required).
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the account password (required).
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets a prefix for the `User-Agent` header on all requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Allows requests to plain-HTTP (`http://`) server addresses.
    ///
    /// By default every non-HTTPS address is refused with a structured
    /// connection error before any network attempt. This opt-in is intended
    /// for local mock servers and tunnels; production configurations should
    /// never set it.
    #[must_use]
    pub const fn allow_insecure_http(mut self) -> Self {
        self.allow_insecure_http = true;
        self
    }

    /// Builds the configuration, validating all fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if a required field was
    /// never set, or the relevant validation error if a field is invalid.
    pub fn build(self) -> Result<FmConfig, ConfigError> {
        let server = self
            .server
            .ok_or(ConfigError::MissingRequiredField { field: "server" })?;
        let database = self
            .database
            .ok_or(ConfigError::MissingRequiredField { field: "database" })?;
        let user = self
            .user
            .ok_or(ConfigError::MissingRequiredField { field: "user" })?;
        let password = self
            .password
            .ok_or(ConfigError::MissingRequiredField { field: "password" })?;

        Ok(FmConfig {
            server: ServerUrl::new(server)?,
            database: DatabaseName::new(database)?,
            user: AccountName::new(user)?,
            password: Password::new(password)?,
            user_agent_prefix: self.user_agent_prefix,
            allow_insecure_http: self.allow_insecure_http,
        })
    }
}
