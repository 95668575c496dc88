//! Session manager — the single source of truth for "who is signed in".
//!
//! DESIGN
//! ======
//! State lives behind a mutex and is only mutated between suspension points
//! by the task running the current operation, so readers always observe a
//! consistent snapshot. Hydration resolves the session against the backend
//! exactly once per lifetime; logout resets it so the next navigation
//! re-resolves. Concurrent logins are not deduplicated: two simultaneous
//! calls make two backend calls and the last response to settle wins.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;

use crate::net::refresh::ApiClient;
use crate::net::transport::ApiRequest;
use crate::net::types::{ApiError, AuthResponse, Identity};

const ME_PATH: &str = "/auth/me";
const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const LOGOUT_PATH: &str = "/auth/logout";
const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";
const RESET_PASSWORD_PATH: &str = "/auth/reset-password";

/// User-facing defaults when the backend supplies no failure message.
const LOGIN_FAILED: &str = "Đăng nhập thất bại";
const REGISTER_FAILED: &str = "Đăng ký thất bại";

// =============================================================================
// STATE
// =============================================================================

/// Client-held belief about the current identity.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Present iff the user is authenticated.
    pub identity: Option<Identity>,
    /// Whether the session has been resolved against the backend at least
    /// once since startup (or since the last logout).
    pub hydrated: bool,
    /// A login/register call is in progress.
    pub loading: bool,
    /// Display message recorded by the last failed login/register.
    pub last_error: Option<String>,
}

// =============================================================================
// MANAGER
// =============================================================================

/// Owns the session state and the auth operations that mutate it.
pub struct SessionManager {
    api: Arc<ApiClient>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, state: Mutex::new(SessionState::default()) }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the current state for callers (views, guard).
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state().clone()
    }

    /// Whether an identity is currently present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().identity.is_some()
    }

    /// Whether the session has been resolved at least once.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.state().hydrated
    }

    /// Resolve the session against the backend, once per lifetime.
    ///
    /// Already-hydrated sessions return immediately without a backend call.
    /// Failures — including a refresh that could not recover — resolve to
    /// "unauthenticated" rather than surfacing: to navigation, an
    /// unreachable backend and a signed-out user look the same.
    pub async fn hydrate(&self) {
        if self.state().hydrated {
            return;
        }

        let identity = match self.api.execute(ApiRequest::get(ME_PATH)).await {
            Ok(resp) => match resp.json::<AuthResponse>() {
                Ok(auth) => Some(auth.user),
                Err(e) => {
                    tracing::warn!(error = %e, "session payload unreadable");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "session resolved unauthenticated");
                None
            }
        };

        let mut state = self.state();
        state.identity = identity;
        state.hydrated = true;
    }

    /// Sign in and replace the current identity.
    ///
    /// # Errors
    /// Re-raises the backend failure after recording a display message
    /// (the backend's, or a localized default) in `last_error`. `loading`
    /// is cleared on both exits.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = json!({ "email": email, "password": password });
        self.credential_call(ApiRequest::post_json(LOGIN_PATH, body), LOGIN_FAILED).await
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    /// Same discipline as [`Self::login`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = json!({ "username": username, "email": email, "password": password });
        self.credential_call(ApiRequest::post_json(REGISTER_PATH, body), REGISTER_FAILED).await
    }

    /// Shared login/register flow: loading + last_error discipline around
    /// one credential call whose success payload carries the new identity.
    async fn credential_call(&self, req: ApiRequest, fallback: &str) -> Result<(), ApiError> {
        {
            let mut state = self.state();
            state.loading = true;
            state.last_error = None;
        }

        let result = self.api.execute(req).await.and_then(|resp| resp.json::<AuthResponse>());

        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(auth) => {
                state.identity = Some(auth.user);
                Ok(())
            }
            Err(e) => {
                state.last_error = Some(e.server_message().unwrap_or(fallback).to_owned());
                Err(e)
            }
        }
    }

    /// Sign out. The local identity is cleared however the backend call
    /// ends, and `hydrated` resets so the next navigation re-resolves.
    ///
    /// # Errors
    /// Returns the backend failure, after local state is already cleared.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.execute(ApiRequest::post(LOGOUT_PATH)).await;
        let mut state = self.state();
        state.identity = None;
        state.hydrated = false;
        result.map(|_| ())
    }

    /// Request a password-reset email. No local session mutation.
    ///
    /// # Errors
    /// The backend failure, unchanged.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let body = json!({ "email": email });
        self.api.execute(ApiRequest::post_json(FORGOT_PASSWORD_PATH, body)).await.map(|_| ())
    }

    /// Redeem a reset token. No local session mutation.
    ///
    /// # Errors
    /// The backend failure, unchanged.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let body = json!({ "token": token, "newPassword": new_password });
        self.api.execute(ApiRequest::post_json(RESET_PASSWORD_PATH, body)).await.map(|_| ())
    }
}
