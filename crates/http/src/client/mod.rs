//! Muster API client
//!
//! Every authenticated request goes through [`ApiClient::dispatch`]: the
//! stored access token is attached as a bearer credential, a 401 answer
//! triggers at most one refresh-and-retry cycle, and an unrecoverable
//! refresh failure tears the session down.

pub mod auth;
pub mod devices;
pub mod employees;
pub mod equipments;
pub mod error;
pub mod maintenances;

use error::ClientError;
use muster_core::store::TokenStore;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, ClientBuilder, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// API endpoint paths, trailing slashes as the backend routes them
pub(crate) mod paths {
    pub const LOGIN: &str = "/api/login/";
    pub const REGISTER: &str = "/api/register/";
    pub const TOKEN_REFRESH: &str = "/api/token/refresh/";
    pub const TOKEN_BLACKLIST: &str = "/api/token/blacklist/";
    pub const EMPLOYEES: &str = "/api/employees/";
    pub const EQUIPMENTS: &str = "/api/equipments/";
    pub const DEVICES: &str = "/api/devices/";
    pub const MAINTENANCES: &str = "/api/maintenances/";
}

/// Default API origin
pub const DEFAULT_BASE_URL: &str = "https://api.smartlogger.io";

/// Whether a request carries the stored access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthMode {
    /// Attach `Authorization: Bearer <access>` when a token is stored
    Bearer,
    /// Session endpoints: always sent unauthenticated
    None,
}

/// One field of a multipart form. File parts are re-read per attempt so
/// a retried request rebuilds an identical form.
#[derive(Debug, Clone)]
pub(crate) enum FormField {
    Text { name: String, value: String },
    File { name: String, path: PathBuf },
}

#[derive(Debug, Clone)]
pub(crate) enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<FormField>),
}

/// Immutable description of an outbound request. The retry decision is
/// carried by the dispatch loop's attempt counter, not by mutating the
/// request itself.
#[derive(Debug, Clone)]
pub(crate) struct RequestSpec {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    auth: AuthMode,
}

impl RequestSpec {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            auth: AuthMode::Bearer,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub(crate) fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub(crate) fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub(crate) fn form(mut self, fields: Vec<FormField>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub(crate) fn unauthenticated(mut self) -> Self {
        self.auth = AuthMode::None;
        self
    }
}

/// Muster API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    /// Single in-flight refresh shared across concurrent requests
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a new client against the default origin
    pub fn new(store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        Self::builder().store(store).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Execute a request and deserialize the response payload
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
    ) -> Result<T, ClientError> {
        let response = self.dispatch(&spec).await?;
        Ok(response.json().await?)
    }

    /// Execute a request, discarding the response body
    pub(crate) async fn execute_unit(&self, spec: RequestSpec) -> Result<(), ClientError> {
        self.dispatch(&spec).await.map(drop)
    }

    /// Send a request through the auth interceptor.
    ///
    /// A 401 on the first attempt triggers exactly one refresh-and-retry;
    /// a 401 on the retry, or a failed refresh, abandons the session and
    /// propagates the 401-derived error.
    async fn dispatch(&self, spec: &RequestSpec) -> Result<reqwest::Response, ClientError> {
        let mut attempt: u8 = 0;
        loop {
            let token = match spec.auth {
                AuthMode::Bearer => self.store.access().await?,
                AuthMode::None => None,
            };

            let response = self.send_once(spec, token.as_deref()).await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::UNAUTHORIZED && spec.auth == AuthMode::Bearer {
                if attempt == 0 {
                    attempt += 1;
                    match self.refresh_access_token(token.as_deref()).await {
                        Ok(_) => continue,
                        Err(refresh_err) => {
                            warn!(error = %refresh_err, "token refresh failed, abandoning session");
                            self.abandon_session().await;
                            let message = Self::error_message(response).await;
                            return Err(ClientError::from_status(status, message));
                        }
                    }
                }

                // Already retried once; do not refresh again
                warn!(path = %spec.path, "request unauthorized after retry, abandoning session");
                self.abandon_session().await;
                let message = Self::error_message(response).await;
                return Err(ClientError::from_status(status, message));
            }

            let message = Self::error_message(response).await;
            return Err(ClientError::from_status(status, message));
        }
    }

    /// Issue a single attempt of a request, no interception
    async fn send_once(
        &self,
        spec: &RequestSpec,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self.client.request(spec.method.clone(), url);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        request = match &spec.body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Form(fields) => request.multipart(Self::build_form(fields)?),
        };

        Ok(request.send().await?)
    }

    fn build_form(fields: &[FormField]) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for field in fields {
            match field {
                FormField::Text { name, value } => {
                    form = form.text(name.clone(), value.clone());
                }
                FormField::File { name, path } => {
                    let bytes = std::fs::read(path).map_err(|err| {
                        ClientError::Upload(format!("cannot read {}: {err}", path.display()))
                    })?;
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "upload".to_string());
                    form = form.part(name.clone(), Part::bytes(bytes).file_name(file_name));
                }
            }
        }
        Ok(form)
    }

    /// Refresh the access token after an unauthorized response.
    ///
    /// Concurrent callers serialize on the refresh gate; a caller that
    /// waited re-reads the store and skips its own refresh when the
    /// token already changed under it.
    pub(crate) async fn refresh_access_token(
        &self,
        stale_access: Option<&str>,
    ) -> Result<String, ClientError> {
        let _inflight = self.refresh_gate.lock().await;

        if let Some(current) = self.store.access().await? {
            if stale_access != Some(current.as_str()) {
                debug!("access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let refresh = self.store.refresh().await?.ok_or_else(|| {
            ClientError::AuthenticationFailed("no refresh token stored".to_string())
        })?;

        let spec = RequestSpec::post(paths::TOKEN_REFRESH)
            .unauthenticated()
            .json(&crate::types::RefreshRequest { refresh })?;
        let response = self.send_once(&spec, None).await?;
        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(ClientError::from_status(status, message));
        }

        let body: crate::types::RefreshResponse = response.json().await?;
        self.store.set_access(&body.access).await?;
        debug!("access token refreshed");
        Ok(body.access)
    }

    /// Tear the session down after an unrecoverable auth failure
    async fn abandon_session(&self) {
        if let Err(err) = Box::pin(self.logout()).await {
            warn!(error = %err, "session teardown incomplete");
        }
    }

    /// Extract a human-readable message from an error response: the
    /// server's `detail`/`message` field when present, the raw body or
    /// status line otherwise.
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            for key in ["detail", "message"] {
                if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                    return message.to_string();
                }
            }
        }

        if body.is_empty() {
            status.to_string()
        } else {
            body
        }
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    store: Option<Arc<dyn TokenStore>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the token store backing the session
    pub fn store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let store = self
            .store
            .ok_or_else(|| ClientError::Configuration("token store is required".into()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder = client_builder.user_agent("muster-client/0.1.0");
        }

        let client = client_builder.build()?;

        Ok(ApiClient {
            client,
            base_url,
            store,
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }
}
