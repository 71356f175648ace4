//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use crate::sync::RemoteConfig;
use clap::Parser;
use tracing::{error, info, warn};
use url::Url;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "Clientele",
    about = "Customer records with stateless JWT authentication"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "7420")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "clientele.db")]
    pub database: String,

    /// Token lifetime in milliseconds
    #[arg(long, default_value = "86400000")]
    pub token_lifetime_ms: u64,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Base URL of the remote customer directory for /api/customers/sync
    #[arg(long)]
    pub remote_url: Option<String>,

    /// Login ID for the remote customer directory
    #[arg(long, env = "REMOTE_LOGIN_ID")]
    pub remote_login_id: Option<String>,

    /// Password for the remote customer directory
    #[arg(long, env = "REMOTE_PASSWORD", hide_env_values = true)]
    pub remote_password: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Build the remote directory configuration from arguments, if complete.
/// Returns None (sync disabled) when no remote URL is given; logs and
/// returns None when the configuration is partial or the URL is invalid.
/// The base URL is normalized to end with `/` so joining endpoint paths
/// keeps the full configured path.
pub fn build_remote_config(args: &Args) -> Option<RemoteConfig> {
    let url = args.remote_url.as_deref()?;

    let mut base_url = match Url::parse(url) {
        Ok(url) => url,
        Err(e) => {
            error!(url = %url, error = %e, "Invalid remote directory URL");
            return None;
        }
    };
    if !base_url.path().ends_with('/') {
        base_url.set_path(&format!("{}/", base_url.path()));
    }

    match (&args.remote_login_id, &args.remote_password) {
        (Some(login_id), Some(password)) => Some(RemoteConfig {
            base_url,
            login_id: login_id.clone(),
            password: password.clone(),
        }),
        _ => {
            warn!("Remote URL set but credentials are missing; sync disabled");
            None
        }
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    jwt_secret: String,
    token_lifetime_ms: u64,
    remote: Option<RemoteConfig>,
) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        token_lifetime_ms,
        remote,
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
