//! Route guard middleware.
//!
//! Flow Overview: build the request's cookie session, run the gate's `check`,
//! then either continue to the page or redirect. Protected groups send
//! unauthenticated visitors to the check's `redirectTo`; guest-only groups
//! send authenticated visitors to the posts list. The request waits for the
//! whole check, including the simulated delay.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use std::sync::Arc;
use tracing::debug;

use super::resources::{Action, Resources, POSTS};
use crate::auth::{
    gate::LOGIN_PATH, AuthGate, CheckResponse, CookieSession, SessionStore, SESSION_KEY,
};

async fn run_check(gate: &AuthGate, session: &CookieSession) -> CheckResponse {
    debug!("checking user authentication");
    gate.check(session).await
}

/// Lets authenticated requests through; redirects the rest to `/login`.
pub async fn require_auth(
    Extension(gate): Extension<Arc<AuthGate>>,
    request: Request,
    next: Next,
) -> Response {
    let mut session =
        CookieSession::from_headers(request.headers(), gate.config().cookie_secure());
    let check = run_check(&gate, &session).await;

    if check.authenticated {
        return next.run(request).await;
    }

    if check.logout && session.get(SESSION_KEY).is_some() {
        session.clear(SESSION_KEY);
    }

    let target = check.redirect_to.as_deref().unwrap_or(LOGIN_PATH);
    debug!("Not authenticated, redirecting to {target}");
    (session.response_headers(), Redirect::to(target)).into_response()
}

/// Lets unauthenticated requests through; sends logged-in visitors to the
/// posts list.
pub async fn guest_only(
    Extension(gate): Extension<Arc<AuthGate>>,
    Extension(resources): Extension<Arc<Resources>>,
    request: Request,
    next: Next,
) -> Response {
    let session = CookieSession::from_headers(request.headers(), gate.config().cookie_secure());
    let check = run_check(&gate, &session).await;

    if !check.authenticated {
        return next.run(request).await;
    }

    let target = resources
        .path(POSTS, Action::List, None)
        .unwrap_or_else(|| "/".to_string());
    debug!("Already authenticated, redirecting to {target}");
    Redirect::to(&target).into_response()
}
