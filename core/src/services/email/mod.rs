//! Outgoing e-mail abstraction
//!
//! The SMTP implementation lives in `eh_infra`; the in-memory outbox here
//! backs tests and local runs without a mail server.

mod templates;

pub use templates::{confirmation_email, password_changed_email, password_reset_email};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

/// Trait for e-mail delivery
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> DomainResult<()>;
}

/// Keeps every message in memory instead of sending it
#[derive(Clone, Default)]
pub struct InMemoryEmailSender {
    outbox: Arc<RwLock<Vec<EmailMessage>>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.outbox.read().await.clone()
    }

    /// Most recent message addressed to `to`
    pub async fn last_to(&self, to: &str) -> Option<EmailMessage> {
        self.outbox
            .read()
            .await
            .iter()
            .rev()
            .find(|m| m.to.eq_ignore_ascii_case(to))
            .cloned()
    }

    /// Value of `key` in the link of the last message sent to `to`
    pub async fn last_link_param(&self, to: &str, key: &str) -> Option<String> {
        let message = self.last_to(to).await?;
        extract_link_param(&message.text_body, key)
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, message: EmailMessage) -> DomainResult<()> {
        self.outbox.write().await.push(message);
        Ok(())
    }
}

fn extract_link_param(body: &str, key: &str) -> Option<String> {
    let needle = format!("{}=", key);
    let start = body.find(&needle)? + needle.len();
    let value: String = body[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    (!value.is_empty()).then_some(value)
}
