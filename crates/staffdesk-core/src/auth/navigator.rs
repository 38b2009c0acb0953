use tracing::info;

/// Unauthenticated entry point the client returns to when a session ends.
pub const ENTRY_PATH: &str = "/";

/// Moves the user somewhere after the session is torn down.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator for headless use: records the move in the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!(path, "Session ended, navigating to entry point");
    }
}
