//! Low-level JSON HTTP client with per-request retry.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HttpError;
use crate::http::retry::RetryPolicy;

/// Shared JSON client for the SDK's HTTP collaborators.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        policy: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_json(|| self.client.get(url), policy).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        policy: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_json(|| self.client.post(url).json(body), policy)
            .await
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
        policy: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = policy.config();
        let max_retries = config.as_ref().map(|c| c.max_retries).unwrap_or(0);
        let mut attempt = 0u32;

        loop {
            let error = match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.json::<T>().await?);
                    }
                    let retryable = config
                        .as_ref()
                        .map(|c| c.retries_status(status.as_u16()))
                        .unwrap_or(false);
                    let error = HttpError::ServerError {
                        status: status.as_u16(),
                        body: response.text().await.unwrap_or_default(),
                    };
                    if !retryable {
                        return Err(error);
                    }
                    error
                }
                Err(err) if err.is_timeout() => HttpError::Timeout,
                Err(err) => HttpError::Reqwest(err),
            };

            if attempt >= max_retries {
                if attempt > 0 {
                    return Err(HttpError::MaxRetriesExceeded {
                        attempts: attempt + 1,
                        last_error: error.to_string(),
                    });
                }
                return Err(error);
            }
            let delay = config
                .as_ref()
                .map(|c| c.delay_for_attempt(attempt))
                .unwrap_or_default();
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
