//! Per-request bearer-token authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use super::session::AuthSession;
use crate::db::Database;
use crate::jwt::JwtConfig;

/// State for the authentication middleware: the account lookup and the
/// process-wide signing context.
#[derive(Clone)]
pub struct AuthBackend {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

/// Authenticate a request from its `Authorization: Bearer` header.
///
/// Runs once per request, before any handler. On success an [`AuthSession`]
/// is inserted into the request extensions; on any failure (missing header,
/// bad token, unknown subject, expired token) the request simply proceeds
/// unauthenticated. This layer never rejects a request; enforcement is the
/// job of the extractors downstream.
pub async fn authenticate(
    State(backend): State<AuthBackend>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        if request.extensions().get::<AuthSession>().is_none() {
            if let Some(session) = resolve_session(&backend, token).await {
                request.extensions_mut().insert(session);
            }
        }
    }

    next.run(request).await
}

/// Extract the raw token from the `Authorization` header. The `"Bearer "`
/// prefix match is case-sensitive with a single trailing space.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Turn a raw token into a session, or None if anything along the way fails.
async fn resolve_session(backend: &AuthBackend, token: &str) -> Option<AuthSession> {
    let subject = match backend.jwt.extract_subject(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return None;
        }
    };

    let customer = match backend.db.customers().get_by_email(&subject).await {
        Ok(Some(customer)) => customer,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!(error = %e, "Account lookup failed during authentication");
            return None;
        }
    };

    match backend.jwt.validate(token, &customer.email) {
        Ok(true) => Some(AuthSession { customer }),
        Ok(false) => None,
        Err(e) => {
            tracing::debug!(error = %e, "Token validation failed");
            None
        }
    }
}
