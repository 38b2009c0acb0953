//! Explicit request pipeline.
//!
//! A [`Pipeline`] runs every request through its [`RequestHook`]s in order,
//! hands it to the [`Transport`], then folds the outcome through its
//! [`ResponseHook`]s. Response hooks may replay a request with
//! [`Pipeline::dispatch`], which re-runs the request hooks and the transport
//! but not the response hooks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{ApiError, ApiRequest, ApiResponse, Transport};
use crate::auth::CredentialStore;

/// Pre-send hook. Must not fail.
pub trait RequestHook: Send + Sync {
    fn on_request(&self, request: ApiRequest) -> ApiRequest;
}

/// Post-send hook, given the request as it was sent.
#[async_trait]
pub trait ResponseHook: Send + Sync {
    async fn on_response(
        &self,
        pipeline: &Pipeline,
        request: ApiRequest,
        result: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError>;
}

/// Stamps the stored access token on every outbound request.
pub struct BearerAuth {
    store: Arc<CredentialStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }
}

impl RequestHook for BearerAuth {
    fn on_request(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(token) = self.store.access_token() {
            request.set_bearer(&token);
        }
        request
    }
}

pub struct Pipeline {
    transport: Arc<dyn Transport>,
    request_hooks: Vec<Arc<dyn RequestHook>>,
    response_hooks: Vec<Arc<dyn ResponseHook>>,
}

impl Pipeline {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            request_hooks: Vec::new(),
            response_hooks: Vec::new(),
        }
    }

    pub fn with_request_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.request_hooks.push(hook);
        self
    }

    pub fn with_response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response_hooks.push(hook);
        self
    }

    fn prepare(&self, request: ApiRequest) -> ApiRequest {
        self.request_hooks
            .iter()
            .fold(request, |request, hook| hook.on_request(request))
    }

    /// Run request hooks and send, skipping response hooks.
    pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = self.prepare(request);
        self.transport.send(&request).await
    }

    /// Run the full pipeline for one request.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = self.prepare(request);
        let mut result = self.transport.send(&request).await;
        for hook in &self.response_hooks {
            result = hook.on_response(self, request.clone(), result).await;
        }
        if let Err(ref e) = result {
            debug!(method = %request.method, path = %request.path, error = %e, "Request failed");
        }
        result
    }
}
