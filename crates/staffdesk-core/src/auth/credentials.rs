use std::sync::Arc;

use tracing::warn;

use super::storage::{CredentialStorage, MemoryStorage, NoopStorage};
use super::Session;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_NAME_KEY: &str = "user_name";
pub const USER_ROLE_KEY: &str = "user_role";

const ALL_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_NAME_KEY,
    USER_ROLE_KEY,
];

/// Tokens and cached identity, persisted through a [`CredentialStorage`].
///
/// Nothing here fails: storage errors are logged and reads fall back to
/// "absent".
pub struct CredentialStore {
    storage: Arc<dyn CredentialStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// A store with no backing storage; every read is absent.
    pub fn detached() -> Self {
        Self::new(Arc::new(NoopStorage))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read credential");
                None
            }
        }
    }

    fn put(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "Failed to store credential");
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }

    pub fn user_name(&self) -> Option<String> {
        self.get(USER_NAME_KEY)
    }

    pub fn user_role(&self) -> Option<String> {
        self.get(USER_ROLE_KEY)
    }

    pub fn set_tokens(&self, access: &str, refresh: &str) {
        self.put(ACCESS_TOKEN_KEY, access);
        self.put(REFRESH_TOKEN_KEY, refresh);
    }

    pub fn set_user_info(&self, name: &str, role: &str) {
        self.put(USER_NAME_KEY, name);
        self.put(USER_ROLE_KEY, role);
    }

    /// Remove tokens and identity.
    pub fn clear(&self) {
        for key in ALL_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove credential");
            }
        }
    }

    pub fn session(&self) -> Session {
        Session {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            user_name: self.user_name(),
            user_role: self.user_role(),
        }
    }
}
