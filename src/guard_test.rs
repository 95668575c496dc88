use std::sync::Arc;

use super::*;
use crate::net::refresh::ApiClient;
use crate::net::testutil::{ScriptedTransport, ok_json, status};
use crate::net::transport::Transport;

fn guard() -> (Arc<ScriptedTransport>, NavigationGuard) {
    let transport = Arc::new(ScriptedTransport::new());
    let api = Arc::new(ApiClient::new(Arc::clone(&transport) as Arc<dyn Transport>));
    let session = Arc::new(SessionManager::new(api));
    (transport, NavigationGuard::new(session))
}

fn user_json() -> serde_json::Value {
    serde_json::json!({ "user": { "id": 1, "username": "linh", "email": "linh@example.com" } })
}

// =============================================================================
// Route classification
// =============================================================================

#[test]
fn guest_only_routes() {
    for path in [ROUTE_LOGIN, ROUTE_REGISTER, ROUTE_FORGOT_PASSWORD, ROUTE_ADMIN_LOGIN] {
        let class = classify(path);
        assert!(class.guest_only, "{path} should be guest-only");
        assert!(!class.requires_auth, "{path} should not require auth");
    }
}

#[test]
fn admin_login_is_both_guest_only_and_admin() {
    let class = classify(ROUTE_ADMIN_LOGIN);
    assert!(class.guest_only);
    assert!(class.admin);
}

#[test]
fn auth_required_routes() {
    for path in [ROUTE_ADMIN_DASHBOARD, ROUTE_REVIEW_CREATE, ROUTE_PROFILE] {
        assert!(classify(path).requires_auth, "{path} should require auth");
    }
    assert!(classify("/admin/users").requires_auth);
}

#[test]
fn public_routes_carry_no_flags() {
    for path in [ROUTE_FEED, "/post/best-hatchback/42", "/reviews/9"] {
        assert_eq!(classify(path), RouteClass::default(), "{path} should be unflagged");
    }
}

// =============================================================================
// Decision table
// =============================================================================

#[test]
fn guest_only_while_authenticated_redirects_to_feed() {
    assert_eq!(decide(classify(ROUTE_LOGIN), true), Decision::Redirect(ROUTE_FEED));
    assert_eq!(decide(classify(ROUTE_REGISTER), true), Decision::Redirect(ROUTE_FEED));
}

#[test]
fn admin_login_while_authenticated_redirects_to_admin_dashboard() {
    assert_eq!(decide(classify(ROUTE_ADMIN_LOGIN), true), Decision::Redirect(ROUTE_ADMIN_DASHBOARD));
}

#[test]
fn auth_required_while_unauthenticated_redirects_to_login() {
    assert_eq!(decide(classify(ROUTE_PROFILE), false), Decision::Redirect(ROUTE_LOGIN));
    assert_eq!(decide(classify(ROUTE_REVIEW_CREATE), false), Decision::Redirect(ROUTE_LOGIN));
}

#[test]
fn admin_path_while_unauthenticated_redirects_to_admin_login() {
    assert_eq!(decide(classify(ROUTE_ADMIN_DASHBOARD), false), Decision::Redirect(ROUTE_ADMIN_LOGIN));
    assert_eq!(decide(classify("/admin/users"), false), Decision::Redirect(ROUTE_ADMIN_LOGIN));
}

#[test]
fn everything_else_is_allowed() {
    assert_eq!(decide(classify(ROUTE_FEED), false), Decision::Allow);
    assert_eq!(decide(classify(ROUTE_FEED), true), Decision::Allow);
    assert_eq!(decide(classify(ROUTE_LOGIN), false), Decision::Allow);
    assert_eq!(decide(classify(ROUTE_PROFILE), true), Decision::Allow);
}

// =============================================================================
// Guard adapter
// =============================================================================

#[tokio::test]
async fn first_navigation_hydrates_exactly_once() {
    let (transport, guard) = guard();
    transport.script("/auth/me", status(500));

    assert_eq!(guard.before_each(ROUTE_FEED).await, Decision::Allow);
    assert_eq!(guard.before_each("/post/best-hatchback/42").await, Decision::Allow);

    assert_eq!(transport.count("/auth/me"), 1);
}

#[tokio::test]
async fn unauthenticated_admin_navigation_redirects_to_admin_login() {
    let (transport, guard) = guard();
    transport.script("/auth/me", status(500));

    assert_eq!(guard.before_each(ROUTE_ADMIN_DASHBOARD).await, Decision::Redirect(ROUTE_ADMIN_LOGIN));
}

#[tokio::test]
async fn authenticated_login_navigation_redirects_to_feed() {
    let (transport, guard) = guard();
    transport.script("/auth/me", ok_json(user_json()));

    assert_eq!(guard.before_each(ROUTE_LOGIN).await, Decision::Redirect(ROUTE_FEED));
}
