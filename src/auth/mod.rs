//! Stateless bearer-token authentication.
//!
//! Every API request passes through the [`authenticate`] middleware once,
//! before any handler. A valid `Authorization: Bearer <token>` header
//! attaches an [`AuthSession`] to the request extensions; anything else
//! leaves the request unauthenticated and lets it proceed. Handlers enforce
//! access through the [`CurrentCustomer`] extractor. Login itself goes
//! through [`CredentialVerifier`], which checks credentials and account
//! state before issuing a token.

mod errors;
mod extractors;
mod middleware;
mod password;
mod principal;
mod session;
mod verifier;

pub use errors::{LoginError, NotAuthenticated};
pub use extractors::CurrentCustomer;
pub use middleware::{AuthBackend, authenticate};
pub use password::{hash_password, verify_password};
pub use principal::{CustomerPrincipal, Principal};
pub use session::AuthSession;
pub use verifier::CredentialVerifier;
