//! Request-scoped authenticated session.

use crate::db::Customer;

/// The principal attached to a request after successful token validation.
///
/// Carried explicitly in the request extensions, never in thread-local or
/// global state, so it lives exactly as long as the request it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated customer record
    pub customer: Customer,
}
