//! Navigation guard — hydrate once, then decide allow/redirect.
//!
//! DESIGN
//! ======
//! Route classification and the redirect decision are pure functions over a
//! destination path and the authenticated flag; the async
//! [`NavigationGuard`] adapter only adds the one-time session hydration.
//! The host router runs the guard for one navigation to completion before
//! starting the next, so hydration is never re-entered concurrently.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use crate::session::SessionManager;

// =============================================================================
// ROUTES
// =============================================================================

pub const ROUTE_FEED: &str = "/";
pub const ROUTE_LOGIN: &str = "/login";
pub const ROUTE_REGISTER: &str = "/register";
pub const ROUTE_FORGOT_PASSWORD: &str = "/forgot-password";
pub const ROUTE_ADMIN_LOGIN: &str = "/admin/login";
pub const ROUTE_ADMIN_DASHBOARD: &str = "/admin/dashboard";
pub const ROUTE_REVIEW_CREATE: &str = "/reviews/new";
pub const ROUTE_PROFILE: &str = "/profile";

const ADMIN_PREFIX: &str = "/admin";

/// Classification of a destination along the two independent axes the
/// decision table cares about. A guest-only admin page (the admin login) is
/// both `guest_only` and `admin`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteClass {
    /// Only makes sense signed out: login, register, password recovery.
    pub guest_only: bool,
    /// Requires a signed-in user.
    pub requires_auth: bool,
    /// Lies under the administrative path prefix.
    pub admin: bool,
}

/// Classify a destination path. Unknown paths (feed, review detail pages)
/// carry no flags and are always allowed.
#[must_use]
pub fn classify(path: &str) -> RouteClass {
    let admin = path == ADMIN_PREFIX || path.starts_with("/admin/");
    let guest_only = matches!(
        path,
        ROUTE_LOGIN | ROUTE_REGISTER | ROUTE_FORGOT_PASSWORD | ROUTE_ADMIN_LOGIN
    );
    let requires_auth =
        path == ROUTE_REVIEW_CREATE || path == ROUTE_PROFILE || (admin && !guest_only);
    RouteClass { guest_only, requires_auth, admin }
}

// =============================================================================
// DECISION
// =============================================================================

/// Outcome of the guard for one navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Let the navigation proceed unchanged.
    Allow,
    /// Send the user to this route instead.
    Redirect(&'static str),
}

/// Pure decision table over a classified destination and the session's
/// authenticated flag.
///
/// - Guest-only page while authenticated → the role-appropriate landing
///   page (admin dashboard for the admin login page, feed otherwise).
/// - Auth-required page while unauthenticated → the matching login page
///   (admin login under the admin prefix, general login otherwise).
/// - Everything else → allow.
#[must_use]
pub fn decide(class: RouteClass, authenticated: bool) -> Decision {
    if class.guest_only && authenticated {
        let landing = if class.admin { ROUTE_ADMIN_DASHBOARD } else { ROUTE_FEED };
        return Decision::Redirect(landing);
    }
    if class.requires_auth && !authenticated {
        let login = if class.admin { ROUTE_ADMIN_LOGIN } else { ROUTE_LOGIN };
        return Decision::Redirect(login);
    }
    Decision::Allow
}

// =============================================================================
// GUARD ADAPTER
// =============================================================================

/// Async adapter the host router invokes before each navigation.
pub struct NavigationGuard {
    session: Arc<SessionManager>,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Guard one navigation to `path`: block on session hydration if this
    /// is the first navigation since startup (or logout), then apply the
    /// decision table.
    pub async fn before_each(&self, path: &str) -> Decision {
        if !self.session.is_hydrated() {
            self.session.hydrate().await;
        }
        decide(classify(path), self.session.is_authenticated())
    }
}
