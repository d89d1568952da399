//! Retry with exponential backoff for outbound HTTP calls.
//!
//! Connection failures, timeouts, `429` and `5xx` responses are retried up
//! to `RetryConfig::max_retries` times. Any other response is handed back to
//! the caller as is.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};

use eh_core::{DomainError, DomainResult};
use eh_shared::RetryConfig;

pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Send the request built by `build` until it gets a final answer.
///
/// `build` is called once per attempt because a `RequestBuilder` cannot be
/// reused after `send`.
pub async fn send_with_retry<F>(
    retry: &RetryConfig,
    service: &str,
    mut build: F,
) -> DomainResult<Response>
where
    F: FnMut() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let outcome = build().send().await;

        let retryable = match &outcome {
            Ok(response) => is_retryable_status(response.status()),
            Err(err) => is_retryable_error(err),
        };

        if !retryable {
            return outcome.map_err(|err| {
                tracing::error!(service, error = %err, "Request failed");
                unavailable(service)
            });
        }

        if attempt >= retry.max_retries {
            match &outcome {
                Ok(response) => tracing::warn!(
                    service,
                    status = %response.status(),
                    attempts = attempt + 1,
                    "Giving up after retries"
                ),
                Err(err) => tracing::warn!(
                    service,
                    error = %err,
                    attempts = attempt + 1,
                    "Giving up after retries"
                ),
            }
            return Err(unavailable(service));
        }

        attempt += 1;
        let delay = retry.backoff_ms(attempt);
        tracing::debug!(service, attempt, delay_ms = delay, "Retrying request");
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

fn unavailable(service: &str) -> DomainError {
    DomainError::ServiceUnavailable {
        service: service.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unavailable_after_retries() {
        let retry = RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 2,
            request_timeout_ms: 500,
        };
        let client = reqwest::Client::new();
        let mut attempts = 0;

        let result = send_with_retry(&retry, "auth", || {
            attempts += 1;
            client.get("http://127.0.0.1:1/health")
        })
        .await;

        assert_eq!(
            result.unwrap_err(),
            DomainError::ServiceUnavailable {
                service: "auth".to_string()
            }
        );
        assert_eq!(attempts, 3);
    }
}
