//! Login orchestration: credential check, account-state checks, token issuance.

use std::sync::Arc;

use super::errors::LoginError;
use super::password::verify_password;
use super::principal::{CustomerPrincipal, Principal};
use crate::db::CustomerStore;
use crate::jwt::JwtConfig;

/// Verifies login credentials and issues tokens.
pub struct CredentialVerifier {
    store: CustomerStore,
    jwt: Arc<JwtConfig>,
}

impl CredentialVerifier {
    pub fn new(store: CustomerStore, jwt: Arc<JwtConfig>) -> Self {
        Self { store, jwt }
    }

    /// Authenticate an identifier/password pair and return a signed token.
    ///
    /// The credential check runs before any account-state check, and the
    /// state flags are checked in a fixed order (disabled, locked, expired,
    /// credentials expired), so the caller always learns the most specific
    /// applicable failure.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, LoginError> {
        let customer = self
            .store
            .get_by_email(identifier)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Account lookup failed during login");
                LoginError::Internal("Account lookup failed".to_string())
            })?
            .ok_or(LoginError::PrincipalNotFound)?;

        let principal = CustomerPrincipal(&customer);

        if !verify_password(principal.hashed_credential(), password) {
            return Err(LoginError::CredentialMismatch);
        }
        if !principal.is_enabled() {
            return Err(LoginError::AccountDisabled);
        }
        if !principal.is_non_locked() {
            return Err(LoginError::AccountLocked);
        }
        if !principal.is_non_expired() {
            return Err(LoginError::AccountExpired);
        }
        if !principal.credentials_non_expired() {
            return Err(LoginError::CredentialsExpired);
        }

        let token = self
            .jwt
            .issue(principal.identifier(), Default::default())
            .map_err(|e| {
                tracing::error!(error = %e, "Token issuance failed");
                LoginError::Internal("Token issuance failed".to_string())
            })?;

        tracing::info!(identifier = %identifier, "Login succeeded");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::db::{CustomerProfile, Database};

    async fn setup(email: &str, password: &str) -> (Database, CredentialVerifier) {
        let db = Database::open(":memory:").await.unwrap();
        let hash = hash_password(password).unwrap();
        db.customers()
            .create(
                "uuid-1",
                &hash,
                &CustomerProfile {
                    email: email.to_string(),
                    first_name: "Known".to_string(),
                    last_name: "Customer".to_string(),
                    phone: String::new(),
                    street: String::new(),
                    address: String::new(),
                    city: String::new(),
                    state: String::new(),
                },
            )
            .await
            .unwrap();

        let jwt = Arc::new(JwtConfig::new(b"test-secret-key-for-testing", 60_000));
        let verifier = CredentialVerifier::new(db.customers(), jwt);
        (db, verifier)
    }

    #[tokio::test]
    async fn test_login_success_issues_valid_token() {
        let (_db, verifier) = setup("known@x.com", "rightpass").await;

        let token = verifier.login("known@x.com", "rightpass").await.unwrap();

        let jwt = JwtConfig::new(b"test-secret-key-for-testing", 60_000);
        assert_eq!(jwt.extract_subject(&token).unwrap(), "known@x.com");
        assert!(jwt.validate(&token, "known@x.com").unwrap());
    }

    #[tokio::test]
    async fn test_unknown_identifier() {
        let (_db, verifier) = setup("known@x.com", "rightpass").await;

        assert!(matches!(
            verifier.login("unknown@x.com", "any").await.unwrap_err(),
            LoginError::PrincipalNotFound
        ));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (_db, verifier) = setup("known@x.com", "rightpass").await;

        assert!(matches!(
            verifier.login("known@x.com", "wrongpass").await.unwrap_err(),
            LoginError::CredentialMismatch
        ));
    }

    #[tokio::test]
    async fn test_disabled_account_with_right_password() {
        let (db, verifier) = setup("known@x.com", "rightpass").await;
        db.customers()
            .set_account_flags("uuid-1", false, false, false, false)
            .await
            .unwrap();

        // Credential check passes first, so the state failure is reported
        assert!(matches!(
            verifier.login("known@x.com", "rightpass").await.unwrap_err(),
            LoginError::AccountDisabled
        ));
    }

    #[tokio::test]
    async fn test_disabled_account_with_wrong_password() {
        let (db, verifier) = setup("known@x.com", "rightpass").await;
        db.customers()
            .set_account_flags("uuid-1", false, false, false, false)
            .await
            .unwrap();

        // Credential check precedes the account-state checks
        assert!(matches!(
            verifier.login("known@x.com", "wrongpass").await.unwrap_err(),
            LoginError::CredentialMismatch
        ));
    }

    #[tokio::test]
    async fn test_state_flag_order() {
        let (db, verifier) = setup("known@x.com", "rightpass").await;

        // Locked and credentials expired: locked wins
        db.customers()
            .set_account_flags("uuid-1", true, true, false, true)
            .await
            .unwrap();
        assert!(matches!(
            verifier.login("known@x.com", "rightpass").await.unwrap_err(),
            LoginError::AccountLocked
        ));

        // Account expired and credentials expired: account expiry wins
        db.customers()
            .set_account_flags("uuid-1", true, false, true, true)
            .await
            .unwrap();
        assert!(matches!(
            verifier.login("known@x.com", "rightpass").await.unwrap_err(),
            LoginError::AccountExpired
        ));

        db.customers()
            .set_account_flags("uuid-1", true, false, false, true)
            .await
            .unwrap();
        assert!(matches!(
            verifier.login("known@x.com", "rightpass").await.unwrap_err(),
            LoginError::CredentialsExpired
        ));
    }

    #[tokio::test]
    async fn test_synced_record_cannot_log_in() {
        let (db, verifier) = setup("known@x.com", "rightpass").await;
        db.customers()
            .create(
                "uuid-2",
                "",
                &CustomerProfile {
                    email: "synced@x.com".to_string(),
                    first_name: "Remote".to_string(),
                    last_name: "Record".to_string(),
                    phone: String::new(),
                    street: String::new(),
                    address: String::new(),
                    city: String::new(),
                    state: String::new(),
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            verifier.login("synced@x.com", "").await.unwrap_err(),
            LoginError::CredentialMismatch
        ));
    }
}
