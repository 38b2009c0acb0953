//! staffdesk core - API client, token refresh, credential storage, models.
//!
//! The interesting part is the request pipeline in [`api`]: every request is
//! stamped with the stored access token, and a 401 triggers a single shared
//! token refresh after which the failed requests are replayed.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, Envelope};
pub use auth::{AuthService, CredentialStore, Navigator, Session};
pub use config::{Config, StorageBackend};
