//! The high-level Data API client.
//!
//! [`DataClient`] is the type callers hold. It wires the request normalizer,
//! the session manager, and the transport together: each data operation
//! builds its canonical body, borrows a token (authenticating lazily),
//! dispatches, and routes any failure through the error normalizer before it
//! reaches the caller.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::auth::SessionManager;
use crate::clients::errors::FmError;
use crate::clients::http_client::{Auth, FmMethod, FmRequest, HttpClient, RawResponse};
use crate::clients::request::RequestOptions;
use crate::clients::response::{parse_response, CreateResult, EmptyResult, FindResult, FmResponse};
use crate::config::FmConfig;

/// An authenticated client for one hosted FileMaker database.
///
/// The client owns its session: tokens are acquired on first use, reused
/// across operations, and re-acquired on the call after the server rejects
/// one. Multiple operations may be in flight concurrently against the same
/// client; each succeeds or fails independently.
///
/// # Example
///
/// ```rust,ignore
/// use fmdata::{DataClient, FmConfig, RequestOptions};
/// use serde_json::json;
///
/// let client = DataClient::new(
///     FmConfig::builder()
///         .server("https://fms.example.com")
///         .database("Heroes")
///         .user("admin")
///         .password("secret")
///         .build()?,
/// );
///
/// let created = client.create("Heroes", json!({"name": "Yoda"}), None).await?;
/// let found = client
///     .find("Heroes", json!({"name": "Yoda"}), Some(RequestOptions::new().limit(2)))
///     .await?;
/// client.delete("Heroes", &created.record_id, None).await?;
/// ```
#[derive(Debug)]
pub struct DataClient {
    http: Arc<HttpClient>,
    session: SessionManager,
}

// Verify DataClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DataClient>();
};

impl DataClient {
    /// Creates a client for the configured server and database.
    ///
    /// No network traffic happens here; the first data operation (or an
    /// explicit [`DataClient::authenticate`]) opens the session.
    #[must_use]
    pub fn new(config: FmConfig) -> Self {
        let http = Arc::new(HttpClient::new(&config));
        let session = SessionManager::new(Arc::clone(&http), &config);
        Self { http, session }
    }

    /// Returns the current session token, if one is held.
    ///
    /// After a token-expiry failure this returns `None`, matching the empty
    /// `token` field on the surfaced error.
    pub async fn token(&self) -> Option<String> {
        self.session.token().await
    }

    /// Opens a session explicitly and returns the token.
    ///
    /// Operations authenticate lazily, so calling this is only needed to
    /// warm up a session or to verify credentials.
    ///
    /// # Errors
    ///
    /// Surfaces the normalized error when authentication fails; the client
    /// stays unauthenticated and may retry.
    pub async fn authenticate(&self) -> Result<String, FmError> {
        self.session.authenticate().await
    }

    /// Releases the session server-side and clears it locally.
    ///
    /// Local state always ends unauthenticated, even when the server-side
    /// release fails.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; the signature leaves room for local
    /// failures to surface normalized.
    pub async fn logout(&self) -> Result<(), FmError> {
        self.session.logout().await
    }

    /// Creates a record on the given layout.
    ///
    /// # Errors
    ///
    /// Surfaces the normalized error for authentication, transport, or
    /// server-side failures.
    pub async fn create(
        &self,
        layout: &str,
        field_data: Value,
        options: Option<RequestOptions>,
    ) -> Result<CreateResult, FmError> {
        let options = options.unwrap_or_default();
        let mut body = Map::new();
        body.insert("fieldData".to_string(), field_data);
        options.apply_to_body(&mut body);

        let raw = self
            .dispatch(
                FmMethod::Post,
                format!("/layouts/{layout}/records"),
                Some(Value::Object(body)),
                Vec::new(),
                &options,
            )
            .await?;

        self.finish::<CreateResult>(raw).await
    }

    /// Finds records on the given layout.
    ///
    /// A bare query object is wrapped into the single-element request array
    /// the Data API expects; an array is passed through as given. Paging
    /// (`limit`, `offset`, `sort`) comes from the options.
    ///
    /// # Errors
    ///
    /// Surfaces the normalized error; note the server reports "no records
    /// match" as vendor code 401, which arrives as [`FmError::Api`].
    pub async fn find(
        &self,
        layout: &str,
        query: Value,
        options: Option<RequestOptions>,
    ) -> Result<FindResult, FmError> {
        let options = options.unwrap_or_default();
        let query = match query {
            Value::Array(entries) => Value::Array(entries),
            other => Value::Array(vec![other]),
        };

        let mut body = Map::new();
        body.insert("query".to_string(), query);
        options.apply_find_paging(&mut body);
        options.apply_to_body(&mut body);

        let raw = self
            .dispatch(
                FmMethod::Post,
                format!("/layouts/{layout}/_find"),
                Some(Value::Object(body)),
                Vec::new(),
                &options,
            )
            .await?;

        self.finish::<FindResult>(raw).await
    }

    /// Deletes a record by id.
    ///
    /// A missing (empty) record id fails locally with a validation error
    /// before any network call. Anything else, including ids the server
    /// will reject such as `"-2"`, is sent verbatim so the server's verdict
    /// is the one surfaced.
    ///
    /// # Errors
    ///
    /// [`FmError::Validation`] for a missing id; otherwise the normalized
    /// transport or server error.
    pub async fn delete(
        &self,
        layout: &str,
        record_id: &str,
        options: Option<RequestOptions>,
    ) -> Result<EmptyResult, FmError> {
        if record_id.is_empty() {
            return Err(FmError::Validation {
                message: "A record id is required to delete a record".to_string(),
            });
        }

        let options = options.unwrap_or_default();
        let raw = self
            .dispatch(
                FmMethod::Delete,
                format!("/layouts/{layout}/records/{record_id}"),
                None,
                options.script_params(),
                &options,
            )
            .await?;

        self.finish::<EmptyResult>(raw).await
    }

    /// Sets session-scoped global fields.
    ///
    /// Field names must be fully qualified (`Table::field`); the server
    /// rejects bare names and that rejection surfaces as [`FmError::Api`].
    ///
    /// # Errors
    ///
    /// Surfaces the normalized transport or server error.
    pub async fn globals(
        &self,
        global_fields: Value,
        options: Option<RequestOptions>,
    ) -> Result<EmptyResult, FmError> {
        let options = options.unwrap_or_default();
        let mut body = Map::new();
        body.insert("globalFields".to_string(), global_fields);

        let raw = self
            .dispatch(
                FmMethod::Patch,
                "/globals".to_string(),
                Some(Value::Object(body)),
                Vec::new(),
                &options,
            )
            .await?;

        self.finish::<EmptyResult>(raw).await
    }

    /// Returns the transport, for the container extractor's downloads.
    pub(crate) fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// Borrows a token and dispatches one request.
    async fn dispatch(
        &self,
        method: FmMethod,
        path: String,
        body: Option<Value>,
        query: Vec<(String, String)>,
        options: &RequestOptions,
    ) -> Result<RawResponse, FmError> {
        let token = self.session.ensure_token().await?;

        let mut request = FmRequest::new(method, path, Auth::Bearer(token))
            .query(query)
            .timeout(options.request_timeout());
        if let Some(body) = body {
            request = request.body(body);
        }

        self.http.send(request).await
    }

    /// Parses the raw outcome, running the token-expiry invalidation path
    /// before any error is surfaced.
    async fn finish<T: serde::de::DeserializeOwned>(&self, raw: RawResponse) -> Result<T, FmError> {
        match parse_response::<T>(&raw) {
            Ok(FmResponse { response, .. }) => Ok(response),
            Err(error) => Err(self.normalize_failure(error).await),
        }
    }

    /// For token-expiry failures, clears the session first and stamps the
    /// now-cleared (empty) token onto the error, so the caller can observe
    /// that invalidation preceded the error.
    async fn normalize_failure(&self, error: FmError) -> FmError {
        if let FmError::TokenExpired { message, .. } = error {
            self.session.invalidate().await;
            let token = self.session.token().await.unwrap_or_default();
            return FmError::TokenExpired { message, token };
        }
        error
    }
}
