mod auth;
mod customers;
mod error;
mod sync;

use axum::{Router, middleware};
use std::sync::Arc;

use crate::auth::{AuthBackend, authenticate};
use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::sync::RemoteConfig;

/// Create the API router. The bearer-token authenticator is layered over the
/// whole router so every request gets exactly one authentication pass; the
/// auth endpoints simply ignore the (optional) session it produces.
pub fn create_api_router(
    db: Database,
    jwt: Arc<JwtConfig>,
    remote: Option<Arc<RemoteConfig>>,
) -> Router {
    let auth_state = auth::AuthState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let customers_state = customers::CustomersState { db: db.clone() };

    let sync_state = sync::SyncState {
        db: db.clone(),
        remote,
    };

    let backend = AuthBackend { db, jwt };

    Router::new()
        .nest("/auth", auth::router(auth_state))
        .nest(
            "/customers",
            customers::router(customers_state).merge(sync::router(sync_state)),
        )
        .layer(middleware::from_fn_with_state(backend, authenticate))
}
