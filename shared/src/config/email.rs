//! SMTP configuration for transactional e-mail

use serde::{Deserialize, Serialize};

use super::env_or;

/// SMTP relay settings.
///
/// When `host` is `None` the services fall back to a sender that only logs
/// outgoing messages.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Use STARTTLS instead of implicit TLS
    pub starttls: bool,
    pub from_address: String,
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 587,
            username: None,
            password: None,
            starttls: true,
            from_address: String::from("no-reply@estatehub.local"),
            from_name: String::from("EstateHub"),
        }
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            port: env_or("SMTP_PORT", defaults.port),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            starttls: env_or("SMTP_STARTTLS", defaults.starttls),
            from_address: std::env::var("SMTP_FROM_ADDRESS").unwrap_or(defaults.from_address),
            from_name: std::env::var("SMTP_FROM_NAME").unwrap_or(defaults.from_name),
        }
    }

    /// `"Name <address>"` mailbox string
    pub fn from_mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mailbox() {
        let config = EmailConfig::default();
        assert_eq!(config.from_mailbox(), "EstateHub <no-reply@estatehub.local>");
        assert!(config.host.is_none());
    }
}
