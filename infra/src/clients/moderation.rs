//! HTTP implementation of the ContentModerator trait.
//!
//! POSTs `{"title", "description"}` and expects
//! `{"verdict": "approved"}` or `{"verdict": "rejected", "reason": "..."}`.

use async_trait::async_trait;

use eh_core::services::{ContentModerator, ModerationRequest, ModerationVerdict};
use eh_core::{DomainError, DomainResult};
use eh_shared::RetryConfig;

use super::{http_client, send_with_retry};
use crate::InfrastructureError;

const SERVICE: &str = "content moderation";

pub struct HttpContentModerator {
    client: reqwest::Client,
    endpoint: String,
    retry: RetryConfig,
}

impl HttpContentModerator {
    pub fn new(endpoint: &str, retry: RetryConfig) -> Result<Self, InfrastructureError> {
        Ok(Self {
            client: http_client(&retry)?,
            endpoint: endpoint.to_string(),
            retry,
        })
    }

    fn unavailable() -> DomainError {
        DomainError::ServiceUnavailable {
            service: SERVICE.to_string(),
        }
    }
}

#[async_trait]
impl ContentModerator for HttpContentModerator {
    async fn review(&self, request: &ModerationRequest) -> DomainResult<ModerationVerdict> {
        let response = send_with_retry(&self.retry, SERVICE, || {
            self.client.post(&self.endpoint).json(request)
        })
        .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Moderation endpoint refused the request");
            return Err(Self::unavailable());
        }

        response.json::<ModerationVerdict>().await.map_err(|e| {
            tracing::error!(error = %e, "Malformed moderation verdict");
            Self::unavailable()
        })
    }
}
