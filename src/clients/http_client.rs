//! HTTP transport for Data API communication.
//!
//! This is the only module that touches the network. It composes request
//! URLs, enforces the HTTPS-only rule, applies per-request timeouts, and
//! hands raw status/body pairs upward. It performs no retries and holds no
//! session state.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::clients::errors::{classify_transport, FmError, CONNECTION_ERROR_CODE};
use crate::config::FmConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP methods used by the Data API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FmMethod {
    /// GET, used for container downloads.
    Get,
    /// POST, used for session creation, record creation, and finds.
    Post,
    /// PATCH, used for setting session globals.
    Patch,
    /// DELETE, used for record deletion and session release.
    Delete,
}

/// How a single request authenticates itself.
#[derive(Clone, Debug)]
pub(crate) enum Auth {
    /// Basic credentials, used only on the session endpoint.
    Basic { user: String, password: String },
    /// An existing session token.
    Bearer(String),
}

/// One request to be dispatched by [`HttpClient::send`].
#[derive(Clone, Debug)]
pub(crate) struct FmRequest {
    pub method: FmMethod,
    /// Path below the database base URL, e.g. `/layouts/Heroes/records`.
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub query: Vec<(String, String)>,
    pub auth: Auth,
    pub timeout: Option<std::time::Duration>,
}

impl FmRequest {
    pub(crate) fn new(method: FmMethod, path: impl Into<String>, auth: Auth) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            auth,
            timeout: None,
        }
    }

    pub(crate) fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The raw outcome of a dispatched request: status plus unparsed body text.
///
/// Parsing and error classification happen above this layer so that non-JSON
/// bodies can be normalized rather than lost.
#[derive(Clone, Debug)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Returns `true` for 2xx statuses.
    pub(crate) const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP transport for the Data API.
///
/// One `HttpClient` lives inside each [`crate::DataClient`], wrapping a
/// shared [`reqwest::Client`] configured for rustls TLS.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Database base URL: `{server}/fmi/data/v1/databases/{database}`.
    base_url: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Whether plain-HTTP targets were explicitly allowed at configuration.
    allow_insecure_http: bool,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport for the configured server and database.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: &FmConfig) -> Self {
        let base_url = format!(
            "{}/fmi/data/v1/databases/{}",
            config.server(),
            config.database().as_ref()
        );

        // Build User-Agent header
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}FileMaker Data API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            default_headers,
            allow_insecure_http: config.allow_insecure_http(),
        }
    }

    /// Returns the database base URL for this transport.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this transport.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Rejects targets the client refuses to speak to: anything that is not
    /// an `https://` URL. Applied before any network attempt so a
    /// misconfigured server surfaces as a structured connection error, never
    /// as a silent plain-HTTP request.
    ///
    /// `http://` targets pass only when the configuration explicitly opted in
    /// via [`crate::FmConfigBuilder::allow_insecure_http`]; addresses without
    /// a recognized scheme are refused unconditionally.
    pub(crate) fn guard_scheme(url: &str, allow_insecure_http: bool) -> Result<(), FmError> {
        if url.starts_with("https://") || (allow_insecure_http && url.starts_with("http://")) {
            Ok(())
        } else {
            Err(FmError::Connection {
                code: CONNECTION_ERROR_CODE.to_string(),
                message: format!(
                    "Refusing to connect to '{url}': the Data API requires an https:// server URL"
                ),
            })
        }
    }

    /// Dispatches one request and returns the raw status/body outcome.
    ///
    /// # Errors
    ///
    /// Returns [`FmError::Connection`] for non-HTTPS targets (before any
    /// network attempt), refused connections, and elapsed timeouts. Never
    /// surfaces a raw [`reqwest::Error`].
    pub(crate) async fn send(&self, request: FmRequest) -> Result<RawResponse, FmError> {
        let url = format!("{}{}", self.base_url, request.path);
        Self::guard_scheme(&url, self.allow_insecure_http)?;

        tracing::debug!(method = ?request.method, %url, "dispatching Data API request");

        let mut builder = match request.method {
            FmMethod::Get => self.client.get(&url),
            FmMethod::Post => self.client.post(&url),
            FmMethod::Patch => self.client.patch(&url),
            FmMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            builder = builder.header(key, value);
        }

        builder = match &request.auth {
            Auth::Basic { user, password } => {
                let credentials = BASE64.encode(format!("{user}:{password}"));
                builder.header("Authorization", format!("Basic {credentials}"))
            }
            Auth::Bearer(token) => builder.header("Authorization", format!("Bearer {token}")),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| classify_transport(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(RawResponse { status, body })
    }

    /// Downloads binary content from an absolute URL, used for container
    /// fields whose references point outside the database base path.
    ///
    /// # Errors
    ///
    /// Returns [`FmError::Connection`] for non-HTTPS targets or transport
    /// failures, and [`FmError::Api`] for non-2xx download responses.
    pub(crate) async fn download(&self, url: &str) -> Result<Vec<u8>, FmError> {
        Self::guard_scheme(url, self.allow_insecure_http)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        if !response.status().is_success() {
            return Err(FmError::Api {
                code: response.status().as_u16().to_string(),
                message: format!("Container download from '{url}' failed"),
            });
        }

        let bytes = response.bytes().await.map_err(|e| classify_transport(&e))?;
        Ok(bytes.to_vec())
    }
}
