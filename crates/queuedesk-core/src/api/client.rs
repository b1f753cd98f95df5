//! The request gateway.
//!
//! Every backend call goes through `ApiClient::request`. The pipeline is:
//!
//! 1. attach the session credential (unless the call opts out)
//! 2. send once: no retry, no timeout, no backoff
//! 3. response interceptor: any 401 clears the session, whatever the endpoint
//! 4. parse a JSON body if the response declares one
//! 5. map non-ok statuses to `ApiError`, decode ok bodies into the caller's type

use std::fmt;
use std::sync::Arc;

use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::SessionStore;

use super::ApiError;

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Describes one outbound call. Defaults to an authenticated GET with no body.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<Value>,
    pub requires_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            body: None,
            requires_auth: true,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a body, serialized whole as JSON.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("body is not serializable: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send without the session credential (login and other public routes).
    pub fn without_auth(mut self) -> Self {
        self.requires_auth = false;
        self
    }
}

/// Gateway to the queue backend.
/// Clone is cheap - the reqwest pool and the session are both shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a gateway for `base_url`. An empty base is accepted; requests
    /// then fail at the transport layer.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("queuedesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Issue a call and decode the response body into `T`.
    ///
    /// A body that does not match `T` is an `ApiError::Decode`. Routes that
    /// answer without a JSON body decode from `null`, so `()` and `Option<_>`
    /// are valid targets for them.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let body = self.request_raw(path, options).await?;
        serde_json::from_value(body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Issue a call and return the parsed body untyped (`Value::Null` when
    /// the response carried no JSON).
    pub async fn request_raw(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        if path.is_empty() || !path.starts_with('/') {
            return Err(ApiError::InvalidRequest(format!(
                "path must be backend-relative and start with '/': {:?}",
                path
            )));
        }

        let url = format!("{}{}", self.base_url, path);
        let (token, generation) = self.session.snapshot();
        let token = token.filter(|_| options.requires_auth);

        let mut builder = self
            .client
            .request(options.method.into(), &url)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(ref token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = options.body {
            builder = builder.json(body);
        }

        debug!(method = %options.method, path = path, authed = token.is_some(), "Sending request");
        let response = builder.send().await?;
        let status = response.status();
        debug!(method = %options.method, path = path, status = status.as_u16(), "Response received");

        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_session(path);
        }

        let parsed = Self::read_json(response).await?;

        if !status.is_success() {
            // A malformed error body counts as no body
            let body = parsed.and_then(Result::ok);
            return Err(ApiError::from_status(status, body.as_ref()));
        }

        if token.is_some() && self.session.generation() != generation {
            warn!(path = path, "Session changed while request was in flight, dropping result");
            return Err(ApiError::StaleSession);
        }

        let body = parsed
            .transpose()
            .map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            })?;
        Ok(body.unwrap_or(Value::Null))
    }

    /// Response interceptor for 401. Applies to every endpoint, including
    /// ones called without the credential.
    fn invalidate_session(&self, path: &str) {
        if self.session.has_credential() {
            warn!(path = path, "Backend rejected credential, clearing session");
        }
        self.session.clear_credential();
    }

    /// Read and parse the body if the response declares JSON. `None` when
    /// the content type is not JSON or the body is empty.
    async fn read_json(
        response: reqwest::Response,
    ) -> Result<Option<Result<Value, serde_json::Error>>, ApiError> {
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase().contains(JSON_CONTENT_TYPE))
            .unwrap_or(false);
        if !is_json {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)))
    }
}
