//! Registration and login endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use crate::auth::{CredentialVerifier, LoginError, hash_password};
use crate::db::{CustomerProfile, CustomerView, Database};
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

#[derive(Deserialize)]
struct RegisterRequest {
    #[serde(flatten)]
    profile: CustomerProfile,
    password: String,
}

async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.profile.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("A valid email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::bad_request("Password cannot be empty"));
    }

    let existing = state
        .db
        .customers()
        .get_by_email(&email)
        .await
        .db_err("Failed to check for existing account")?;
    if existing.is_some() {
        return Err(ApiError::conflict("Account already exists"));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    let uuid = uuid::Uuid::new_v4().to_string();
    let mut profile = payload.profile;
    profile.email = email;

    state
        .db
        .customers()
        .create(&uuid, &password_hash, &profile)
        .await
        .db_err("Failed to create customer")?;

    let customer = state
        .db
        .customers()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to load created customer")?
        .ok_or_else(|| ApiError::internal("Created customer not found"))?;

    tracing::info!(uuid = %uuid, "Customer registered");
    Ok((StatusCode::CREATED, Json(CustomerView::from(&customer))))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
}

async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let verifier = CredentialVerifier::new(state.db.customers(), state.jwt.clone());

    let token = verifier
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| match e {
            LoginError::PrincipalNotFound => ApiError::not_found(e.to_string()),
            LoginError::CredentialMismatch
            | LoginError::AccountDisabled
            | LoginError::AccountLocked
            | LoginError::AccountExpired
            | LoginError::CredentialsExpired => ApiError::unauthorized(e.to_string()),
            LoginError::Internal(msg) => ApiError::internal(msg),
        })?;

    Ok(Json(LoginResponse { token }))
}
