//! Request/response descriptors and the HTTP transport that moves them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{ApiError, Envelope};

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// An outbound API call, relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: header::HeaderMap,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: header::HeaderMap::new(),
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Set `Authorization: Bearer <token>`, replacing any previous value.
    /// Tokens that are not valid header values are ignored.
    pub fn set_bearer(&mut self, token: &str) {
        match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                self.headers.insert(header::AUTHORIZATION, value);
            }
            Err(_) => debug!(path = %self.path, "Skipping malformed bearer token"),
        }
    }

    /// The bearer token currently attached, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    /// Whether this request has already been replayed after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub fn mark_retried(&mut self) {
        self.retried = true;
    }
}

/// A successful response with its decoded JSON body (`Null` when empty).
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Decode the standard envelope and unwrap its data.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        self.json::<Envelope<T>>()?.into_result()
    }
}

/// Sends fully prepared requests. Non-2xx statuses come back as `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Resolve `path` against `base`, treating `base` as a directory.
pub fn join_url(base: &Url, path: &str) -> Result<Url, ApiError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ApiError::Validation(format!("Invalid request path {}: {}", path, e)))
}

pub fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    Url::parse(base_url)
        .map_err(|e| ApiError::Validation(format!("Invalid base URL {}: {}", base_url, e)))
}

/// reqwest-backed transport.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn build_client(timeout: Duration) -> Result<Client, ApiError> {
        Ok(Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Turn a non-success response into an error, keeping the server's
    /// envelope when it sent one.
    fn error_for(status: StatusCode, body: &str) -> ApiError {
        if status != StatusCode::UNAUTHORIZED {
            if let Ok(envelope) = serde_json::from_str::<Envelope<Value>>(body) {
                if !envelope.success {
                    return ApiError::Rejected {
                        message: envelope.failure_text(),
                        errors: envelope.errors,
                    };
                }
            }
        }
        ApiError::from_status(status, body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = join_url(&self.base_url, &request.path)?;
        debug!(method = %request.method, path = %request.path, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(path = %request.path, status = status.as_u16(), "Request failed");
            return Err(Self::error_for(status, &text));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                ApiError::InvalidResponse(format!(
                    "Failed to parse JSON response from {}: {}",
                    request.path, e
                ))
            })?
        };
        Ok(ApiResponse::new(status, body))
    }
}
