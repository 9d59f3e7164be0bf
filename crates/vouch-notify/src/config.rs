//! Email configuration from environment variables.
//!
//! ```bash
//! # Provider: SMTP
//! VOUCH_EMAIL_PROVIDER=smtp
//! SMTP_HOST=smtp.example.com
//! SMTP_PORT=587
//! SMTP_USERNAME=user@example.com
//! SMTP_PASSWORD=app_password
//! SMTP_USE_TLS=true
//!
//! # Sender config
//! VOUCH_EMAIL_FROM=noreply@example.com
//! VOUCH_EMAIL_FROM_NAME="Vouch"
//!
//! # Optional link base; the token is appended
//! VOUCH_ACCEPT_URL_BASE=https://example.com/invitations/accept/
//! ```

use std::env;

use thiserror::Error;

/// Email configuration for invitation notices
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email provider configuration
    pub provider: EmailProviderConfig,
    /// From email address
    pub from_address: String,
    /// Optional from name
    pub from_name: Option<String>,
    /// Optional base URL for the accept link; the token is appended
    pub accept_url_base: Option<String>,
}

/// Email provider configuration
#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    /// SMTP email provider
    Smtp {
        /// SMTP host
        host: String,
        /// SMTP port
        port: u16,
        /// Optional username
        username: Option<String>,
        /// Optional password
        password: Option<String>,
        /// Whether to use TLS
        use_tls: bool,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid email provider: {0}. Expected 'smtp'")]
    InvalidProvider(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Missing from address: VOUCH_EMAIL_FROM is required when email is configured")]
    MissingFromAddress,

    #[error("SMTP provider requires SMTP_HOST")]
    SmtpMissingHost,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// `Ok(None)` when no provider is configured; the caller decides whether
    /// an engine without a notifier is acceptable (it is only when
    /// notifications are disabled).
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(provider_type) = env::var("VOUCH_EMAIL_PROVIDER").ok() else {
            return Ok(None);
        };

        let provider = match provider_type.to_lowercase().as_str() {
            "smtp" => {
                let host = env::var("SMTP_HOST").map_err(|_| ConfigError::SmtpMissingHost)?;
                let port_raw = env::var("SMTP_PORT").unwrap_or_else(|_| "587".to_string());
                let port = port_raw
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;
                let username = env::var("SMTP_USERNAME").ok();
                let password = env::var("SMTP_PASSWORD").ok();
                let use_tls = env::var("SMTP_USE_TLS")
                    .map(|v| v.to_lowercase() == "true" || v == "1")
                    .unwrap_or(true); // TLS by default

                EmailProviderConfig::Smtp {
                    host,
                    port,
                    username,
                    password,
                    use_tls,
                }
            }
            other => return Err(ConfigError::InvalidProvider(other.to_string())),
        };

        let from_address =
            env::var("VOUCH_EMAIL_FROM").map_err(|_| ConfigError::MissingFromAddress)?;
        let from_name = env::var("VOUCH_EMAIL_FROM_NAME").ok();
        let accept_url_base = env::var("VOUCH_ACCEPT_URL_BASE").ok();

        Ok(Some(Self {
            provider,
            from_address,
            from_name,
            accept_url_base,
        }))
    }
}
