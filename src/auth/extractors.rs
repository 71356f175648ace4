//! Axum extractors for the authenticated session.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::NotAuthenticated;
use super::session::AuthSession;

/// Extractor for endpoints that require an authenticated customer.
/// Rejects with a 401 JSON error when the request carries no session.
pub struct CurrentCustomer(pub AuthSession);

impl<S> FromRequestParts<S> for CurrentCustomer
where
    S: Send + Sync,
{
    type Rejection = NotAuthenticated;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthSession>()
            .cloned()
            .map(CurrentCustomer)
            .ok_or(NotAuthenticated)
    }
}
