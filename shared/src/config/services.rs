//! Outbound service endpoints used by the listing service

use serde::{Deserialize, Serialize};

use super::env_or;

/// Retry policy for outbound HTTP calls.
///
/// Backoff doubles after every failed attempt and is capped at
/// `max_backoff_ms`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 2_000,
            request_timeout_ms: 5_000,
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_or("HTTP_MAX_RETRIES", defaults.max_retries),
            initial_backoff_ms: env_or("HTTP_INITIAL_BACKOFF_MS", defaults.initial_backoff_ms),
            max_backoff_ms: env_or("HTTP_MAX_BACKOFF_MS", defaults.max_backoff_ms),
            request_timeout_ms: env_or("HTTP_REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms)
    }
}

/// Where the listing service finds its collaborators
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceEndpoints {
    /// Base URL of the authorization service
    pub auth_service_url: String,

    /// Content moderation endpoint; moderation is skipped when unset
    #[serde(default)]
    pub moderation_url: Option<String>,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            auth_service_url: String::from("http://localhost:5001"),
            moderation_url: None,
            retry: RetryConfig::default(),
        }
    }
}

impl ServiceEndpoints {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_service_url: std::env::var("AUTH_SERVICE_URL")
                .unwrap_or(defaults.auth_service_url),
            moderation_url: std::env::var("MODERATION_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            retry: RetryConfig::from_env(),
        }
    }
}
