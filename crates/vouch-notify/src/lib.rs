//! Email notifier for vouch invitations.
//!
//! Provides the concrete [`vouch_core::Notifier`] collaborator: an
//! environment-driven configuration layer and an SMTP transport built on
//! `lettre`. The engine itself never learns what a notice looks like on the
//! wire; everything transport-specific lives here.

mod config;
mod smtp;
mod templates;

pub use config::{ConfigError, EmailConfig, EmailProviderConfig};
pub use smtp::SmtpNotifier;
pub use templates::InvitationEmailContent;

use vouch_core::{Notifier, NotifyError};

/// Create a notifier from configuration.
pub fn create_notifier(config: &EmailConfig) -> Result<Box<dyn Notifier>, NotifyError> {
    match &config.provider {
        EmailProviderConfig::Smtp {
            host,
            port,
            username,
            password,
            use_tls,
        } => {
            let notifier = SmtpNotifier::new(
                host.clone(),
                *port,
                username.clone(),
                password.clone(),
                *use_tls,
                config.from_address.clone(),
                config.from_name.clone(),
                config.accept_url_base.clone(),
            )?;
            Ok(Box::new(notifier))
        }
    }
}
