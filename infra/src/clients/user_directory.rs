//! HTTP implementation of the UserDirectory trait.
//!
//! Calls the authorization service on behalf of the current caller,
//! forwarding the caller's bearer token.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use eh_core::domain::value_objects::UserSummary;
use eh_core::services::UserDirectory;
use eh_core::{DomainError, DomainResult};
use eh_shared::RetryConfig;

use super::{http_client, send_with_retry, trim_base_url};
use crate::InfrastructureError;

const SERVICE: &str = "authorization service";

#[derive(Debug, Deserialize)]
struct UserStats {
    total_users: u64,
}

pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl HttpUserDirectory {
    /// `base_url` is the authorization service root, e.g. `http://auth:5001`
    pub fn new(base_url: &str, retry: RetryConfig) -> Result<Self, InfrastructureError> {
        Ok(Self {
            client: http_client(&retry)?,
            base_url: trim_base_url(base_url),
            retry,
        })
    }

    pub(crate) fn user_url(&self, id: Uuid) -> String {
        format!("{}/api/v1/users/{}", self.base_url, id)
    }

    pub(crate) fn stats_url(&self) -> String {
        format!("{}/api/v1/users/stats", self.base_url)
    }

    async fn get(&self, url: &str, access_token: &str) -> DomainResult<reqwest::Response> {
        send_with_retry(&self.retry, SERVICE, || {
            self.client.get(url).bearer_auth(access_token)
        })
        .await
    }

    fn unexpected(status: StatusCode) -> DomainError {
        match status {
            StatusCode::UNAUTHORIZED => DomainError::Unauthorized,
            status => {
                tracing::warn!(%status, "Unexpected response from the authorization service");
                DomainError::ServiceUnavailable {
                    service: SERVICE.to_string(),
                }
            }
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> DomainResult<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "Malformed response from the authorization service");
            DomainError::ServiceUnavailable {
                service: SERVICE.to_string(),
            }
        })
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn find_user(&self, id: Uuid, access_token: &str) -> DomainResult<Option<UserSummary>> {
        let response = self.get(&self.user_url(id), access_token).await?;

        match response.status() {
            StatusCode::OK => Self::decode(response).await.map(Some),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(Self::unexpected(status)),
        }
    }

    async fn count_users(&self, access_token: &str) -> DomainResult<u64> {
        let response = self.get(&self.stats_url(), access_token).await?;

        match response.status() {
            StatusCode::OK => Self::decode::<UserStats>(response)
                .await
                .map(|stats| stats.total_users),
            status => Err(Self::unexpected(status)),
        }
    }
}
