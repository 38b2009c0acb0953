use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by the request pipeline.
///
/// `Clone` so a single refresh failure can be handed to every caller that was
/// queued behind it.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The server answered with `success: false`.
    #[error("Request rejected: {message}")]
    Rejected {
        message: String,
        errors: Option<serde_json::Value>,
    },

    #[error("No refresh token available")]
    MissingRefreshToken,

    /// The caller leading a token refresh went away before it finished.
    #[error("Token refresh was interrupted")]
    RefreshInterrupted,

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(Arc::new(err))
    }
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Payload to hand back inside a failure envelope.
    ///
    /// Uses the server's error body when one was captured, otherwise the
    /// error's display text.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            ApiError::Rejected {
                errors: Some(errors),
                ..
            } => errors.clone(),
            ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::ServerError(body) => serde_json::from_str(body)
                .unwrap_or_else(|_| serde_json::Value::String(self.to_string())),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}
