//! Session lifecycle management for the Data API.
//!
//! A Data API session is an opaque token acquired by POSTing Basic
//! credentials to the sessions endpoint. The [`SessionManager`] owns that
//! token: it hands it out, re-acquires it lazily when absent, clears it when
//! the server rejects it, and releases it on logout.
//!
//! # Concurrency
//!
//! All session state lives behind one [`tokio::sync::Mutex`]. Authentication
//! runs while the lock is held, so concurrent callers that raced to discover
//! a missing token queue on the lock and observe the token the first caller
//! stored, so N simultaneous discoveries cost exactly one authentication
//! round-trip.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::clients::errors::FmError;
use crate::clients::http_client::{Auth, FmMethod, FmRequest, HttpClient};
use crate::clients::response::{parse_response, AuthPayload, FmResponse};
use crate::config::FmConfig;

/// The current authentication state of a client.
///
/// Invariant: `token` is either `None` (unauthenticated) or a non-empty
/// credential the server has not yet rejected.
#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Option<String>,
    issued_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Returns the current token, if one is held.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns when the current token was issued, if one is held.
    #[must_use]
    pub const fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    fn store(&mut self, token: String) {
        self.token = Some(token);
        self.issued_at = Some(Utc::now());
    }

    fn clear(&mut self) {
        self.token = None;
        self.issued_at = None;
    }
}

/// Owns the session token and serializes all transitions on it.
///
/// One `SessionManager` exists per [`crate::DataClient`]; it is never shared
/// across clients and there is no process-wide session state.
#[derive(Debug)]
pub struct SessionManager {
    http: Arc<HttpClient>,
    user: String,
    password: String,
    state: Mutex<Session>,
}

impl SessionManager {
    /// Creates a manager for the configured credentials, starting
    /// unauthenticated.
    #[must_use]
    pub fn new(http: Arc<HttpClient>, config: &FmConfig) -> Self {
        Self {
            http,
            user: config.user().as_ref().to_string(),
            password: config.password().as_ref().to_string(),
            state: Mutex::new(Session::default()),
        }
    }

    /// Returns the current token without authenticating.
    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.token().map(String::from)
    }

    /// Acquires a fresh token, replacing any token currently held.
    ///
    /// # Errors
    ///
    /// Surfaces the normalized error when the server rejects the credentials
    /// or cannot be reached; the session is left unauthenticated so the
    /// caller may retry.
    pub async fn authenticate(&self) -> Result<String, FmError> {
        let mut session = self.state.lock().await;
        session.clear();
        let token = self.open_session().await?;
        session.store(token.clone());
        Ok(token)
    }

    /// Returns the held token, authenticating first if none is held.
    ///
    /// The session lock is held across the authentication await; that is the
    /// single-flight guard the concurrency contract requires.
    ///
    /// # Errors
    ///
    /// Surfaces the normalized authentication error; the session stays
    /// unauthenticated.
    pub async fn ensure_token(&self) -> Result<String, FmError> {
        let mut session = self.state.lock().await;
        if let Some(token) = session.token() {
            return Ok(token.to_string());
        }
        let token = self.open_session().await?;
        session.store(token.clone());
        Ok(token)
    }

    /// Clears the held token locally without contacting the server.
    ///
    /// Called when a request fails because the server no longer honors the
    /// token; the next operation re-authenticates instead of replaying a
    /// dead credential.
    pub async fn invalidate(&self) {
        self.state.lock().await.clear();
    }

    /// Releases the token server-side and clears it locally.
    ///
    /// Local state always ends unauthenticated: a failed server-side release
    /// is logged and swallowed, because the client must not stay wedged on a
    /// token the caller asked to discard. A logout with no token held is a
    /// local no-op.
    pub async fn logout(&self) -> Result<(), FmError> {
        let mut session = self.state.lock().await;
        let Some(token) = session.token().map(String::from) else {
            return Ok(());
        };
        session.clear();
        drop(session);

        let request = FmRequest::new(
            FmMethod::Delete,
            format!("/sessions/{token}"),
            Auth::Bearer(token.clone()),
        );
        match self.http.send(request).await {
            Ok(raw) if raw.is_success() => {}
            Ok(raw) => {
                tracing::warn!(status = raw.status, "server-side session release failed");
            }
            Err(error) => {
                tracing::warn!(%error, "server-side session release failed");
            }
        }
        Ok(())
    }

    /// POSTs Basic credentials to the sessions endpoint and extracts the
    /// token from the response body.
    async fn open_session(&self) -> Result<String, FmError> {
        let request = FmRequest::new(
            FmMethod::Post,
            "/sessions",
            Auth::Basic {
                user: self.user.clone(),
                password: self.password.clone(),
            },
        )
        .body(serde_json::json!({}));

        let raw = self.http.send(request).await?;
        let parsed: FmResponse<AuthPayload> = parse_response(&raw)?;
        tracing::debug!("opened Data API session");
        Ok(parsed.response.token)
    }
}
