//! Invitation configuration.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;
use vouch_storage::IdentityField;

use crate::notify::Notifier;

/// Configuration errors, fatal at engine construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("notifications are enabled but no notifier is configured")]
    NotifierRequired,

    #[error("identity order must name at least one attribute")]
    EmptyIdentityOrder,
}

/// Options controlling issuance, expiration, and notification wiring.
///
/// `Default` gives the documented defaults; "resetting" configuration is just
/// constructing a fresh value. One engine holds one validated config — there
/// is no process-wide mutable state.
#[derive(Clone)]
pub struct InvitationConfig {
    /// Identifying attributes checked during issuance, in match order.
    pub identity_order: Vec<IdentityField>,
    /// Time-to-live for a newly issued token. `None` means tokens never
    /// expire.
    pub expiration_period: Option<Duration>,
    /// When true, issuance never sends a notice.
    pub notifications_disabled: bool,
    /// Delivery capability for invitation notices. Required unless
    /// notifications are disabled.
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            identity_order: vec![IdentityField::Email],
            expiration_period: None,
            notifications_disabled: false,
            notifier: None,
        }
    }
}

impl InvitationConfig {
    /// Check the cross-field invariants. Run once by the engine constructor;
    /// a violation means the engine cannot be built at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.notifications_disabled && self.notifier.is_none() {
            return Err(ConfigError::NotifierRequired);
        }
        if self.identity_order.is_empty() {
            return Err(ConfigError::EmptyIdentityOrder);
        }
        Ok(())
    }
}

impl fmt::Debug for InvitationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvitationConfig")
            .field("identity_order", &self.identity_order)
            .field("expiration_period", &self.expiration_period)
            .field("notifications_disabled", &self.notifications_disabled)
            .field("notifier", &self.notifier.as_ref().map(|_| "<dyn Notifier>"))
            .finish()
    }
}
