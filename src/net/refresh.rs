//! Refresh coordinator — transparent recovery from expired credentials.
//!
//! DESIGN
//! ======
//! Every outgoing request goes through [`ApiClient::execute`]. When the
//! backend answers 401, the client performs one shared `POST /auth/refresh`
//! and replays the failed request once. The in-flight refresh is a `Shared`
//! future stored behind a mutex: the slot is checked and filled
//! synchronously, before the first await of the refresh attempt, so however
//! many requests fail inside the same scheduling window, exactly one refresh
//! call reaches the wire and every waiter shares its outcome. The slot also
//! carries a generation counter: a 401 on a request that was already on the
//! wire when a refresh settled is stale, and gets replayed against the
//! renewed credential instead of starting another refresh.
//!
//! Requests against credential-lifecycle endpoints (login, register, the
//! refresh endpoint itself, the password-reset family) are never recovered;
//! a 401 from the refresh endpoint must surface, not recurse.

#[cfg(test)]
#[path = "refresh_test.rs"]
mod refresh_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use super::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use super::types::ApiError;
use crate::config::ApiConfig;

/// Path of the credential-refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Endpoints excluded from refresh recovery, matched by path substring.
const LIFECYCLE_PATHS: [&str; 6] = [
    "/auth/refresh",
    "/auth/login",
    "/auth/admin/login",
    "/auth/register",
    "/auth/forgot-password",
    "/auth/reset-password",
];

type RefreshHandle = Shared<BoxFuture<'static, Result<(), ApiError>>>;

/// The optional in-flight refresh plus a generation counter that advances
/// every time a refresh settles. A request that was already on the wire
/// when a refresh settled carries a stale generation; its 401 predates the
/// renewal and must not start another refresh.
#[derive(Default)]
struct RefreshSlot {
    handle: Option<RefreshHandle>,
    generation: u64,
}

/// Whether `path` belongs to the credential-lifecycle family that must not
/// trigger a refresh on failure.
#[must_use]
pub fn is_lifecycle_path(path: &str) -> bool {
    LIFECYCLE_PATHS.iter().any(|p| path.contains(p))
}

// =============================================================================
// API CLIENT
// =============================================================================

/// Transport wrapper that owns the single in-flight refresh.
///
/// Invariant: at any instant the number of outstanding refresh operations
/// is zero or one.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    inflight: Mutex<RefreshSlot>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, inflight: Mutex::new(RefreshSlot::default()) }
    }

    /// Production client over [`HttpTransport`].
    ///
    /// # Errors
    /// [`ApiError::Network`] when the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Issue a request, recovering from an expired credential at most once.
    ///
    /// # Errors
    /// The original failure when it is not recoverable (non-401, lifecycle
    /// endpoint, or already replayed); the refresh failure — not the
    /// original 401 — when recovery itself fails; the replay's own failure
    /// otherwise.
    pub async fn execute(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        let issued_generation = self.slot().generation;
        let outcome = self.transport.execute(&req).await;
        let Err(err) = &outcome else { return outcome };

        if !err.is_auth_expired() || req.retried || is_lifecycle_path(&req.path) {
            return outcome;
        }

        if let Some(handle) = self.join_refresh(issued_generation) {
            tracing::debug!(path = %req.path, "credential expired; joining refresh");
            let refreshed = handle.clone().await;
            self.clear_settled(&handle);
            refreshed?;
        } else {
            // A refresh settled while this request was on the wire, so its
            // 401 predates the renewed credential. Replay directly.
            tracing::debug!(path = %req.path, "credential renewed mid-flight; replaying");
        }

        self.transport.execute(&req.as_retry()).await
    }

    fn slot(&self) -> MutexGuard<'_, RefreshSlot> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Join the in-flight refresh, or start one — unless a refresh has
    /// already settled since `issued_generation`, in which case the failure
    /// is stale and `None` says to replay without refreshing. The
    /// check-and-set is synchronous: a task that observes an empty slot at
    /// the current generation fills it before yielding, so two refreshes
    /// can never coexist.
    fn join_refresh(&self, issued_generation: u64) -> Option<RefreshHandle> {
        let mut slot = self.slot();
        if slot.generation != issued_generation {
            return None;
        }
        if let Some(handle) = slot.handle.as_ref() {
            return Some(handle.clone());
        }

        let transport = Arc::clone(&self.transport);
        let handle: RefreshHandle = async move {
            tracing::info!("refreshing credentials");
            match transport.execute(&ApiRequest::post(REFRESH_PATH)).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    tracing::warn!(error = %e, "credential refresh failed");
                    Err(e)
                }
            }
        }
        .boxed()
        .shared();

        slot.handle = Some(handle.clone());
        Some(handle)
    }

    /// Drop the stored handle once its refresh has settled, advancing the
    /// generation so stale failures stop joining. Ptr-equality keeps a late
    /// waiter from discarding a newer refresh.
    fn clear_settled(&self, handle: &RefreshHandle) {
        let mut slot = self.slot();
        if slot.handle.as_ref().is_some_and(|h| h.ptr_eq(handle)) {
            slot.handle = None;
            slot.generation = slot.generation.wrapping_add(1);
        }
    }
}
