//! HTTP clients for the services the listing service depends on
//!
//! - `user_directory` - user lookups against the authorization service
//! - `moderation` - the external content moderation endpoint
//!
//! Both go through `retry::send_with_retry`.

pub mod moderation;
pub mod retry;
pub mod user_directory;

pub use moderation::HttpContentModerator;
pub use retry::send_with_retry;
pub use user_directory::HttpUserDirectory;

use std::time::Duration;

use eh_shared::RetryConfig;

use crate::InfrastructureError;

/// Client with the per-request timeout from `retry`
pub(crate) fn http_client(retry: &RetryConfig) -> Result<reqwest::Client, InfrastructureError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_millis(retry.request_timeout_ms))
        .user_agent(concat!("estatehub/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
