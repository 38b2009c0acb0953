use serde::{Deserialize, Serialize};

/// Snapshot of the client-held authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_name: Option<String>,
    pub user_role: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Whether an expired access token could still be renewed.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Name and role for display, e.g. `Ada (manager)`.
    pub fn display_identity(&self) -> Option<String> {
        match (&self.user_name, &self.user_role) {
            (Some(name), Some(role)) => Some(format!("{} ({})", name, role)),
            (Some(name), None) => Some(name.clone()),
            _ => None,
        }
    }
}
