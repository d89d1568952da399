use async_trait::async_trait;

use eh_core::services::{EmailMessage, EmailSender};
use eh_core::DomainResult;

/// Writes outgoing messages to the log; for development without SMTP
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEmailSender;

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, message: EmailMessage) -> DomainResult<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text_body,
            "E-mail not sent (no SMTP host configured)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_sender_always_succeeds() {
        let message = EmailMessage {
            to: "someone@example.com".to_string(),
            subject: "Hello".to_string(),
            text_body: "Body".to_string(),
            html_body: None,
        };
        assert!(LoggingEmailSender.send(message).await.is_ok());
    }
}
