//! REST API client module for the employee-management service.
//!
//! Requests flow through a [`Pipeline`]: the [`BearerAuth`] hook stamps the
//! stored access token, the [`HttpTransport`] sends, and the
//! [`SessionRefresh`] hook renews expired tokens and replays the request.
//!
//! Responses use the `{success, data, message, errors}` [`Envelope`].

pub mod client;
pub mod envelope;
pub mod error;
pub mod pipeline;
pub mod refresh;
pub mod transport;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::ApiError;
pub use pipeline::{BearerAuth, Pipeline, RequestHook, ResponseHook};
pub use refresh::{
    RefreshCoordinator, RefreshLease, RefreshedTokens, SessionRefresh, TokenRefresher,
};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
