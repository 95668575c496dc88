//! Wire types and the client-side error taxonomy.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend API calls.
///
/// `Clone` because a single credential refresh fans its outcome out to every
/// request waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, message: Option<String> },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether this failure means the credential has expired (HTTP 401) and
    /// is therefore recoverable by a refresh.
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Human-readable message the backend attached to the failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Network(_) | Self::Parse(_) => None,
        }
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Profile snapshot of the signed-in user.
///
/// Owned exclusively by the session manager and replaced wholesale on
/// login/register/hydrate; cleared on logout. Whether the user is
/// authenticated is derived from its presence, never stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
}

/// Body of successful login/register/who-am-I responses.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: Identity,
}
