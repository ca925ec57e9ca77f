//! The request pipeline.

use crate::{ApiError, ApiResponse, ApiResult, Navigate, Notify, SessionHook};
use hub_config_and_utils::Config;
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

/// Notice raised when the backend answers with a server error.
pub const SERVER_ERROR_NOTICE: &str = "Server error, please retry later";

/// Shared cell holding the bearer token the pipeline attaches to requests.
///
/// The session layer writes it on login/logout; the pipeline reads it on
/// every dispatch. An empty cell simply means requests go out without an
/// Authorization header.
#[derive(Clone, Default)]
pub struct TokenCell(Arc<RwLock<Option<String>>>);

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current token.
    pub fn set(&self, token: &str) {
        *self.0.write().unwrap() = Some(token.to_string());
    }

    /// Drop the current token.
    pub fn clear(&self) {
        *self.0.write().unwrap() = None;
    }

    /// Read the current token.
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap().clone()
    }

    /// Whether a token is currently held.
    pub fn is_present(&self) -> bool {
        self.0.read().unwrap().is_some()
    }
}

/// HTTP client wrapper that implements the request pipeline:
/// bearer-token injection on the way out, uniform 401/5xx handling on the
/// way back. All other failures propagate unchanged to the caller.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: TokenCell,
    notify: Arc<dyn Notify>,
    navigate: Arc<dyn Navigate>,
    session_hook: RwLock<Option<Arc<dyn SessionHook>>>,
    long_timeout: Duration,
}

impl ApiClient {
    /// Create a new client from configuration.
    pub fn new(
        config: &Config,
        notify: Arc<dyn Notify>,
        navigate: Arc<dyn Navigate>,
    ) -> ApiResult<Self> {
        let base_url = Url::parse(&config.api_base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: TokenCell::new(),
            notify,
            navigate,
            session_hook: RwLock::new(None),
            long_timeout: Duration::from_secs(config.long_request_timeout_secs),
        })
    }

    /// Handle to the shared token cell.
    pub fn token(&self) -> TokenCell {
        self.token.clone()
    }

    /// Install the session hook invoked on 401 responses. Called once by
    /// the session layer after it is constructed; until then the pipeline
    /// falls back to clearing the token cell.
    pub fn install_session_hook(&self, hook: Arc<dyn SessionHook>) {
        *self.session_hook.write().unwrap() = Some(hook);
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Dispatch a request and run the response checks in their fixed order:
    /// 401 before 5xx before the generic structured error.
    async fn dispatch(&self, builder: RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(self.handle_failure(status, &body))
    }

    /// The only place global error side effects happen. Public so the
    /// session layer's tests can drive the 401 path without a live server.
    #[doc(hidden)]
    pub fn handle_failure(&self, status: StatusCode, body: &[u8]) -> ApiError {
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%status, "unauthorized response, forcing logout");
            self.force_logout();
            self.navigate.to_login();
        } else if status.is_server_error() {
            tracing::error!(%status, "server error response");
            self.notify.error(SERVER_ERROR_NOTICE);
        }

        ApiError::from_status(status, body)
    }

    fn force_logout(&self) {
        let hook = self.session_hook.read().unwrap().clone();
        match hook {
            Some(hook) => hook.force_logout(),
            // The session layer may not be wired up yet; drop the token so
            // later requests go out unauthenticated instead of crashing.
            None => self.token.clear(),
        }
    }

    async fn json_envelope<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResult<ApiResponse<T>> {
        Ok(response.json::<ApiResponse<T>>().await?)
    }

    /// GET returning a JSON envelope.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<ApiResponse<T>> {
        let builder = self.http.get(self.endpoint(path)?).query(query);
        let response = self.dispatch(builder).await?;
        self.json_envelope(response).await
    }

    /// POST with a JSON body.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ApiResponse<T>> {
        let builder = self.http.post(self.endpoint(path)?).json(body);
        let response = self.dispatch(builder).await?;
        self.json_envelope(response).await
    }

    /// PUT with a JSON body.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ApiResponse<T>> {
        let builder = self.http.put(self.endpoint(path)?).json(body);
        let response = self.dispatch(builder).await?;
        self.json_envelope(response).await
    }

    /// DELETE returning a JSON envelope.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiResponse<T>> {
        let builder = self.http.delete(self.endpoint(path)?);
        let response = self.dispatch(builder).await?;
        self.json_envelope(response).await
    }

    /// POST with no body (resource actions such as run/pause).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiResponse<T>> {
        let builder = self.http.post(self.endpoint(path)?);
        let response = self.dispatch(builder).await?;
        self.json_envelope(response).await
    }

    /// POST with no body and the extended timeout (analysis trigger).
    pub async fn post_empty_long<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ApiResult<ApiResponse<T>> {
        let builder = self
            .http
            .post(self.endpoint(path)?)
            .timeout(self.long_timeout);
        let response = self.dispatch(builder).await?;
        self.json_envelope(response).await
    }

    /// POST carrying parameters in the query string (verification-code send).
    pub async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<ApiResponse<T>> {
        let builder = self.http.post(self.endpoint(path)?).query(query);
        let response = self.dispatch(builder).await?;
        self.json_envelope(response).await
    }

    /// POST a multipart form (avatar upload).
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> ApiResult<ApiResponse<T>> {
        let builder = self.http.post(self.endpoint(path)?).multipart(form);
        let response = self.dispatch(builder).await?;
        self.json_envelope(response).await
    }

    /// GET returning raw bytes (spreadsheet export).
    pub async fn get_blob(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Vec<u8>> {
        let builder = self.http.get(self.endpoint(path)?).query(query);
        let response = self.dispatch(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// GET returning raw bytes with the extended timeout (PPT download).
    pub async fn get_blob_long(&self, path: &str) -> ApiResult<Vec<u8>> {
        let builder = self
            .http
            .get(self.endpoint(path)?)
            .timeout(self.long_timeout);
        let response = self.dispatch(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Build a request without dispatching it. Used by tests to observe
    /// what the pipeline puts on the wire.
    #[doc(hidden)]
    pub fn build_request(&self, method: Method, path: &str) -> ApiResult<reqwest::Request> {
        let builder = self.http.request(method, self.endpoint(path)?);
        Ok(self.authorize(builder).build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NullNavigate, NullNotify};
    use std::sync::Mutex;

    struct RecordingNotify {
        errors: Mutex<Vec<String>>,
    }

    impl RecordingNotify {
        fn new() -> Self {
            Self {
                errors: Mutex::new(Vec::new()),
            }
        }
    }

    impl Notify for RecordingNotify {
        fn success(&self, _message: &str) {}
        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
        fn warning(&self, _message: &str) {}
        fn info(&self, _message: &str) {}
    }

    struct RecordingHook {
        calls: Mutex<u32>,
    }

    impl SessionHook for RecordingHook {
        fn force_logout(&self) {
            *self.calls.lock().unwrap() += 1;
        }
    }

    fn client_with(notify: Arc<dyn Notify>) -> ApiClient {
        let config = Config::default();
        ApiClient::new(&config, notify, Arc::new(NullNavigate)).unwrap()
    }

    #[test]
    fn test_token_cell() {
        let cell = TokenCell::new();
        assert!(!cell.is_present());

        cell.set("abc");
        assert_eq!(cell.get(), Some("abc".to_string()));

        cell.clear();
        assert!(cell.get().is_none());
    }

    #[test]
    fn test_bearer_attached_when_token_present() {
        let client = client_with(Arc::new(NullNotify));
        client.token().set("tok-123");

        let request = client.build_request(Method::GET, "/api/auth/userinfo").unwrap();
        let auth = request.headers().get("authorization").unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer tok-123");
    }

    #[test]
    fn test_no_header_without_token() {
        let client = client_with(Arc::new(NullNotify));

        let request = client.build_request(Method::GET, "/api/crawler/tasks").unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_unauthorized_invokes_hook_and_propagates() {
        let notify = Arc::new(RecordingNotify::new());
        let client = client_with(notify.clone());

        let hook = Arc::new(RecordingHook {
            calls: Mutex::new(0),
        });
        client.install_session_hook(hook.clone());

        let err = client.handle_failure(StatusCode::UNAUTHORIZED, b"{}");
        assert!(err.is_unauthorized());
        assert_eq!(*hook.calls.lock().unwrap(), 1);
        // 401 is not the server-error notice path
        assert!(notify.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unauthorized_before_hook_installed_clears_token() {
        let client = client_with(Arc::new(NullNotify));
        client.token().set("stale");

        let err = client.handle_failure(StatusCode::UNAUTHORIZED, b"{}");
        assert!(err.is_unauthorized());
        assert!(!client.token().is_present());
    }

    #[test]
    fn test_server_error_raises_notice() {
        let notify = Arc::new(RecordingNotify::new());
        let client = client_with(notify.clone());

        let err = client.handle_failure(StatusCode::INTERNAL_SERVER_ERROR, b"{}");
        assert!(err.is_server_error());
        assert_eq!(
            notify.errors.lock().unwrap().as_slice(),
            &[SERVER_ERROR_NOTICE.to_string()]
        );
    }

    #[test]
    fn test_other_statuses_have_no_side_effects() {
        let notify = Arc::new(RecordingNotify::new());
        let client = client_with(notify.clone());
        client.token().set("alive");

        let err = client.handle_failure(StatusCode::CONFLICT, b"{\"message\":\"taken\"}");
        assert!(err.is_conflict());
        assert_eq!(err.message(), "taken");
        assert!(notify.errors.lock().unwrap().is_empty());
        assert!(client.token().is_present());
    }

    #[test]
    fn test_endpoint_join() {
        let client = client_with(Arc::new(NullNotify));
        let url = client.endpoint("/api/crawler/tasks/7/run").unwrap();
        assert!(url.as_str().ends_with("/api/crawler/tasks/7/run"));
    }
}
