//! Access-token refresh on 401.
//!
//! [`RefreshCoordinator`] owns the refresh-in-progress flag and the queue of
//! callers waiting on it. [`SessionRefresh`] is the response hook that drives
//! it: the first unretried 401 leads a refresh cycle, any 401 seen while that
//! cycle is outstanding waits for its outcome, and every caller is replayed
//! (or rejected) once the single refresh call settles.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::pipeline::{Pipeline, ResponseHook};
use super::{ApiError, ApiRequest, ApiResponse};
use crate::auth::{CredentialStore, Navigator, ENTRY_PATH};

/// New access token, or the error that ended the refresh cycle.
pub type RefreshOutcome = Result<String, ApiError>;

/// Tokens returned by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access: String,
    /// Absent when the server does not rotate refresh tokens.
    pub refresh: Option<String>,
}

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, ApiError>;
}

/// What a caller that hit a 401 should do.
#[derive(Debug)]
pub enum Admission<'a> {
    /// No refresh in flight: the caller runs the refresh and settles the lease.
    Lead(RefreshLease<'a>),
    /// A refresh is in flight: await its outcome.
    Wait(oneshot::Receiver<RefreshOutcome>),
}

/// The leader's hold on a refresh cycle.
///
/// Dropping the lease without settling it (the leading future was cancelled
/// or timed out) ends the cycle with [`ApiError::RefreshInterrupted`], so
/// waiters are released and the next 401 can lead a fresh cycle.
#[derive(Debug)]
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    /// End the cycle with `outcome`. Returns how many waiters were released.
    pub fn settle(mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let released = self.coordinator.settle(&Err(ApiError::RefreshInterrupted));
            warn!(released, "Token refresh abandoned before it settled");
        }
    }
}

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Flag and queue live under one lock, which is never held across an await.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn admit(&self) -> Admission<'_> {
        let mut state = self.lock();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            debug!(queued = state.waiters.len(), "Refresh in flight, queueing request");
            Admission::Wait(rx)
        } else {
            state.refreshing = true;
            Admission::Lead(RefreshLease {
                coordinator: self,
                settled: false,
            })
        }
    }

    /// Reset the flag and hand `outcome` to every waiter in enqueue order.
    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        let released = waiters.len();
        for waiter in waiters {
            // Receiver gone means the caller stopped waiting.
            let _ = waiter.send(outcome.clone());
        }
        released
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    pub fn pending(&self) -> usize {
        self.lock().waiters.len()
    }
}

/// Response hook that recovers from expired access tokens.
pub struct SessionRefresh {
    coordinator: RefreshCoordinator,
    store: Arc<CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    navigator: Arc<dyn Navigator>,
}

impl SessionRefresh {
    pub fn new(
        store: Arc<CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            coordinator: RefreshCoordinator::new(),
            store,
            refresher,
            navigator,
        }
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Run one refresh cycle as its leader.
    ///
    /// The store is updated (or cleared) before any waiter is released.
    async fn renew(&self, lease: RefreshLease<'_>) -> RefreshOutcome {
        let outcome = match self.store.refresh_token() {
            None => {
                warn!("Access token rejected and no refresh token stored");
                Err(ApiError::Unauthorized)
            }
            Some(refresh_token) => match self.refresher.refresh(&refresh_token).await {
                Ok(tokens) => {
                    let refresh = tokens.refresh.unwrap_or(refresh_token);
                    self.store.set_tokens(&tokens.access, &refresh);
                    Ok(tokens.access)
                }
                Err(e) => {
                    warn!(error = %e, "Token refresh failed");
                    Err(e)
                }
            },
        };

        if outcome.is_err() {
            self.store.clear();
        }
        let released = lease.settle(&outcome);
        match outcome {
            Ok(_) => info!(released, "Access token refreshed"),
            Err(_) => {
                info!(released, "Session ended, returning to entry point");
                self.navigator.navigate(ENTRY_PATH);
            }
        }
        outcome
    }
}

#[async_trait]
impl ResponseHook for SessionRefresh {
    async fn on_response(
        &self,
        pipeline: &Pipeline,
        mut request: ApiRequest,
        result: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError> {
        match result {
            Err(ApiError::Unauthorized) if !request.is_retried() => {}
            other => return other,
        }

        let token = match self.coordinator.admit() {
            Admission::Lead(lease) => {
                request.mark_retried();
                self.renew(lease).await?
            }
            Admission::Wait(rx) => {
                request.mark_retried();
                rx.await.unwrap_or(Err(ApiError::Unauthorized))?
            }
        };

        debug!(method = %request.method, path = %request.path, "Replaying request with refreshed token");
        request.set_bearer(&token);
        pipeline.dispatch(request).await
    }
}
