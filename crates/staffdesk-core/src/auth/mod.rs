//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `CredentialStore`: token and identity persistence over a storage port
//! - `CredentialStorage` implementations: keychain, file, memory, no-op
//! - `AuthService`: login, explicit refresh, logout
//! - `Navigator`: where the client goes when a session ends

pub mod credentials;
pub mod navigator;
pub mod service;
pub mod session;
pub mod storage;

pub use credentials::{
    CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_NAME_KEY, USER_ROLE_KEY,
};
pub use navigator::{LogNavigator, Navigator, ENTRY_PATH};
pub use service::{AuthService, LoginData, TokenEndpoint, TokenPair};
pub use session::Session;
pub use storage::{
    CredentialStorage, FileStorage, KeyringStorage, MemoryStorage, NoopStorage, StorageError,
};
