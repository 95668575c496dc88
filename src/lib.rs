//! # autoreview-client
//!
//! Session-resilience core for the autoreview web client. This crate owns
//! the parts of the client with real invariants in them:
//!
//! - [`net::refresh::ApiClient`] — HTTP client wrapper that recovers from an
//!   expired credential with a single shared refresh call and one replay of
//!   the failed request.
//! - [`session::SessionManager`] — the single source of truth for "who is
//!   signed in", including one-time session hydration.
//! - [`guard::NavigationGuard`] — gates every navigation on a resolved
//!   session and applies the redirect policy.
//! - [`page_meta::resolve_page_meta`] — normalizes the backend's
//!   inconsistent pagination metadata into a canonical triple.
//!
//! Views, forms, and unrelated UI stores live elsewhere and call into this
//! crate; nothing here renders anything.

pub mod config;
pub mod guard;
pub mod net;
pub mod page_meta;
pub mod session;
