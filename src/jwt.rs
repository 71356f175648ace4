//! JWT token issuance and validation.
//!
//! Tokens are compact HS256-signed claim sets. The signing key and token
//! lifetime are fixed at startup and shared process-wide; expiry is encoded
//! in milliseconds and checked by this module, not by the underlying
//! library, so sub-second lifetimes behave correctly.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Claim set carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (customer email)
    pub sub: String,
    /// Issued at (Unix milliseconds)
    pub iat: u64,
    /// Expiration time (Unix milliseconds)
    pub exp: u64,
    /// Additional claims merged in at issuance
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Configuration for JWT operations. Built once from the configured secret
/// and lifetime, then shared read-only across all requests.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_ms: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret and token
    /// lifetime in milliseconds.
    pub fn new(secret: &[u8], lifetime_ms: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime_ms,
        }
    }

    /// Issue a signed token for the given subject, merging in any extra
    /// claims. Expiry is issuance time plus the configured lifetime.
    pub fn issue(
        &self,
        subject: &str,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> Result<String, JwtError> {
        self.issue_at(subject, extra, current_time_ms()?)
    }

    fn issue_at(
        &self,
        subject: &str,
        extra: serde_json::Map<String, serde_json::Value>,
        now_ms: u64,
    ) -> Result<String, JwtError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now_ms,
            exp: now_ms + self.lifetime_ms,
            extra,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)
    }

    /// Verify the signature and deserialize the claim set.
    ///
    /// Does not check expiry; callers evaluate that via `is_expired` or
    /// `validate`. A signature mismatch is reported as `InvalidSignature`,
    /// any structural problem as `Malformed`.
    pub fn parse_claims(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed,
            })?;

        Ok(token_data.claims)
    }

    /// Extract the subject from a token, verifying the signature.
    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        Ok(self.parse_claims(token)?.sub)
    }

    /// Extract the expiry timestamp (Unix milliseconds) from a token,
    /// verifying the signature.
    pub fn extract_expiry(&self, token: &str) -> Result<u64, JwtError> {
        Ok(self.parse_claims(token)?.exp)
    }

    /// Check whether a token's encoded expiry lies in the past.
    pub fn is_expired(&self, token: &str) -> Result<bool, JwtError> {
        self.is_expired_at(token, current_time_ms()?)
    }

    fn is_expired_at(&self, token: &str, now_ms: u64) -> Result<bool, JwtError> {
        Ok(self.extract_expiry(token)? < now_ms)
    }

    /// Check a token against an expected subject: true iff the subject
    /// matches and the token has not expired.
    ///
    /// Parse failures (bad signature, malformed token) propagate as errors
    /// rather than collapsing to `false`, so callers can distinguish "valid
    /// token for someone else" from "not a valid token at all".
    pub fn validate(&self, token: &str, expected_subject: &str) -> Result<bool, JwtError> {
        self.validate_at(token, expected_subject, current_time_ms()?)
    }

    fn validate_at(
        &self,
        token: &str,
        expected_subject: &str,
        now_ms: u64,
    ) -> Result<bool, JwtError> {
        let claims = self.parse_claims(token)?;
        Ok(claims.sub == expected_subject && claims.exp >= now_ms)
    }
}

fn current_time_ms() -> Result<u64, JwtError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::TimeError)?
        .as_millis() as u64)
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Structurally invalid token (bad segments, encoding, or claims)
    Malformed,
    /// Signature does not verify against the process key
    InvalidSignature,
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Malformed => write!(f, "Malformed token"),
            JwtError::InvalidSignature => write!(f, "Invalid token signature"),
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}
