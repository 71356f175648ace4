pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod sync;

use api::create_api_router;
use axum::Router;
use db::Database;
use jwt::JwtConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use sync::RemoteConfig;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Token lifetime in milliseconds
    pub token_lifetime_ms: u64,
    /// Remote directory for the sync endpoint, if configured
    pub remote: Option<RemoteConfig>,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret, config.token_lifetime_ms));
    let remote = config.remote.clone().map(Arc::new);

    Router::new().nest("/api", create_api_router(config.db.clone(), jwt, remote))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}
