//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Login failures, surfaced distinctly so the API layer can map each to a
/// precise user-facing message. Credential and account-state checks run in
/// the order these variants are declared.
#[derive(Debug)]
pub enum LoginError {
    /// No account matches the identifier
    PrincipalNotFound,
    /// Supplied password does not match the stored hash
    CredentialMismatch,
    /// Account is disabled
    AccountDisabled,
    /// Account is locked
    AccountLocked,
    /// Account has expired
    AccountExpired,
    /// Account credentials have expired
    CredentialsExpired,
    /// Infrastructure failure (lookup or token issuance)
    Internal(String),
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginError::PrincipalNotFound => write!(f, "Account not found"),
            LoginError::CredentialMismatch => write!(f, "Password is incorrect"),
            LoginError::AccountDisabled => write!(f, "Account is disabled"),
            LoginError::AccountLocked => write!(f, "Account is locked"),
            LoginError::AccountExpired => write!(f, "Account is expired"),
            LoginError::CredentialsExpired => write!(f, "Account credentials are expired"),
            LoginError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LoginError {}

/// Rejection for the `CurrentCustomer` extractor: 401 with a JSON body.
#[derive(Debug)]
pub struct NotAuthenticated;

impl IntoResponse for NotAuthenticated {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Not authenticated",
            }),
        )
            .into_response()
    }
}
