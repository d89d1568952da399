//! E-mail delivery
//!
//! `SmtpEmailSender` relays through the configured SMTP server. Without an
//! SMTP host the services use `LoggingEmailSender`, which writes the message
//! to the log instead.

mod logging;
mod smtp;

use std::sync::Arc;

use eh_core::services::EmailSender;
use eh_shared::EmailConfig;

pub use logging::LoggingEmailSender;
pub use smtp::SmtpEmailSender;

use crate::InfrastructureError;

/// Pick the sender matching `config`
pub fn email_sender_from_config(
    config: &EmailConfig,
) -> Result<Arc<dyn EmailSender>, InfrastructureError> {
    match config.host {
        Some(_) => Ok(Arc::new(SmtpEmailSender::new(config)?)),
        None => {
            tracing::warn!("SMTP_HOST is not set; outgoing e-mail will only be logged");
            Ok(Arc::new(LoggingEmailSender))
        }
    }
}
