//! Authentication capability view over account records.

use crate::db::Customer;

/// The capability an account must offer to be authenticated. Kept separate
/// from the stored record so the row type carries no protocol methods.
pub trait Principal {
    fn identifier(&self) -> &str;
    fn hashed_credential(&self) -> &str;
    fn is_enabled(&self) -> bool;
    fn is_non_locked(&self) -> bool;
    fn is_non_expired(&self) -> bool;
    fn credentials_non_expired(&self) -> bool;
}

/// Adapter implementing [`Principal`] over a customer record.
pub struct CustomerPrincipal<'a>(pub &'a Customer);

impl Principal for CustomerPrincipal<'_> {
    fn identifier(&self) -> &str {
        &self.0.email
    }

    fn hashed_credential(&self) -> &str {
        &self.0.password_hash
    }

    fn is_enabled(&self) -> bool {
        self.0.enabled
    }

    fn is_non_locked(&self) -> bool {
        !self.0.locked
    }

    fn is_non_expired(&self) -> bool {
        !self.0.account_expired
    }

    fn credentials_non_expired(&self) -> bool {
        !self.0.credentials_expired
    }
}
