//! SMTP implementation of the EmailSender trait.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use eh_core::services::{EmailMessage, EmailSender};
use eh_core::{DomainError, DomainResult};
use eh_shared::EmailConfig;

use crate::InfrastructureError;

pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| InfrastructureError::Config("SMTP host is not set".to_string()))?;

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        }
        .map_err(|e| InfrastructureError::Email(e.to_string()))?;

        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config
            .from_mailbox()
            .parse::<Mailbox>()
            .map_err(|e| InfrastructureError::Config(format!("Invalid sender address: {}", e)))?;

        tracing::info!(host, port = config.port, "SMTP e-mail sender configured");

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    pub(crate) fn build_message(from: &Mailbox, message: EmailMessage) -> DomainResult<Message> {
        let to = message.to.parse::<Mailbox>().map_err(|e| DomainError::Internal {
            message: format!("Invalid recipient {}: {}", message.to, e),
        })?;

        let builder = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(message.subject);

        let built = match message.html_body {
            Some(html) => {
                builder.multipart(MultiPart::alternative_plain_html(message.text_body, html))
            }
            None => builder.body(message.text_body),
        };

        built.map_err(|e| DomainError::Internal {
            message: format!("Failed to build e-mail: {}", e),
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: EmailMessage) -> DomainResult<()> {
        let to = message.to.clone();
        let email = Self::build_message(&self.from, message)?;

        self.transport.send(email).await.map_err(|e| {
            tracing::error!(to = %to, error = %e, "SMTP delivery failed");
            DomainError::ServiceUnavailable {
                service: "email".to_string(),
            }
        })?;

        tracing::debug!(to = %to, "E-mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(html: Option<&str>) -> EmailMessage {
        EmailMessage {
            to: "buyer@example.com".to_string(),
            subject: "Confirm your e-mail".to_string(),
            text_body: "Open the link".to_string(),
            html_body: html.map(str::to_string),
        }
    }

    fn from() -> Mailbox {
        EmailConfig::default().from_mailbox().parse().unwrap()
    }

    #[test]
    fn test_build_plain_message() {
        let built = SmtpEmailSender::build_message(&from(), message(None)).unwrap();
        let raw = String::from_utf8(built.formatted()).unwrap();

        assert!(raw.contains("Subject: Confirm your e-mail"));
        assert!(raw.contains("To: buyer@example.com"));
        assert!(raw.contains("no-reply@estatehub.local"));
        assert!(raw.contains("Open the link"));
    }

    #[test]
    fn test_build_alternative_message() {
        let built =
            SmtpEmailSender::build_message(&from(), message(Some("<p>Open the link</p>"))).unwrap();
        let raw = String::from_utf8(built.formatted()).unwrap();

        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let mut bad = message(None);
        bad.to = "not an address".to_string();
        assert!(SmtpEmailSender::build_message(&from(), bad).is_err());
    }

    #[test]
    fn test_new_requires_host() {
        assert!(SmtpEmailSender::new(&EmailConfig::default()).is_err());

        let config = EmailConfig {
            host: Some("smtp.example.com".to_string()),
            ..EmailConfig::default()
        };
        assert!(SmtpEmailSender::new(&config).is_ok());
    }
}
