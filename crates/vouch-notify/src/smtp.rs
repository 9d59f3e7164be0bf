//! SMTP notifier implementation.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use vouch_core::{Notifier, NotifyError};
use vouch_storage::Person;

use crate::templates::InvitationEmailContent;

/// SMTP invitation notifier.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    from_name: Option<String>,
    accept_url_base: Option<String>,
}

impl SmtpNotifier {
    /// Create a new SMTP notifier.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        use_tls: bool,
        from_address: String,
        from_name: Option<String>,
        accept_url_base: Option<String>,
    ) -> Result<Self, NotifyError> {
        let mut builder = if use_tls {
            let tls_params = TlsParameters::new(host.clone()).map_err(|e| {
                NotifyError::InvalidConfig(format!("TLS configuration error: {}", e))
            })?;

            // Port 465 uses implicit TLS (SMTPS), other ports use STARTTLS
            if port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
                    .map_err(|e| NotifyError::InvalidConfig(format!("SMTP relay error: {}", e)))?
                    .port(port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                    .map_err(|e| NotifyError::InvalidConfig(format!("SMTP relay error: {}", e)))?
                    .port(port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host).port(port)
        };

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        let transport = builder.build();

        Ok(Self {
            transport,
            from_address,
            from_name,
            accept_url_base,
        })
    }
}

impl SmtpNotifier {
    /// Assemble the invitation message for a person. Fails when the person
    /// carries no stored token.
    fn build_message(&self, person: &Person) -> Result<Message, NotifyError> {
        let token = person
            .invitation
            .token
            .as_deref()
            .ok_or_else(|| NotifyError::SendFailed("person has no invitation token".into()))?;
        let content = InvitationEmailContent::new(token, self.accept_url_base.as_deref());

        let from = match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_address),
            None => self.from_address.clone(),
        };

        Message::builder()
            .from(from
                .parse()
                .map_err(|e| NotifyError::InvalidConfig(format!("Invalid from address: {}", e)))?)
            .to(person
                .email
                .parse()
                .map_err(|e| NotifyError::InvalidConfig(format!("Invalid to address: {}", e)))?)
            .subject(content.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(content.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(content.html),
                    ),
            )
            .map_err(|e| NotifyError::SendFailed(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn deliver(&self, person: &Person) -> Result<(), NotifyError> {
        let message = self.build_message(person)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        Ok(())
    }
}
