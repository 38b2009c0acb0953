//! The `{success, data, message, errors}` response envelope used by every
//! endpoint of the management API, and by the auth service's return values.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;

/// Message used when a failure carries nothing more specific.
pub const GENERIC_FAILURE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn failed(errors: Value) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            errors: Some(errors),
        }
    }

    pub fn from_error(err: &ApiError) -> Self {
        Self::failed(err.payload())
    }

    /// Human-readable failure text: the message if set, else the errors
    /// payload, else a generic message.
    pub fn failure_text(&self) -> String {
        if let Some(ref message) = self.message {
            return message.clone();
        }
        match self.errors {
            Some(Value::String(ref s)) => s.clone(),
            Some(ref other) => other.to_string(),
            None => GENERIC_FAILURE.to_string(),
        }
    }

    /// Collapse the envelope into the data it carries.
    ///
    /// `success: false` becomes [`ApiError::Rejected`]. A successful envelope
    /// without data is only accepted when `T` can be built from JSON `null`.
    pub fn into_result(self) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        if !self.success {
            return Err(ApiError::Rejected {
                message: self.failure_text(),
                errors: self.errors,
            });
        }
        match self.data {
            Some(data) => Ok(data),
            None => serde_json::from_value(Value::Null).map_err(|_| {
                ApiError::InvalidResponse("Envelope reported success without data".to_string())
            }),
        }
    }
}
