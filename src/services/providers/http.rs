//! reqwest-backed [`JsonFetcher`]
//!
//! One shared client with a fixed per-request timeout; retries are the caller's
//! business (see `RetryPolicy`).

use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    services::providers::JsonFetcher,
};

#[derive(Clone)]
pub struct HttpFetcher {
    http_client: HttpClient,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }
}

#[async_trait::async_trait]
impl JsonFetcher for HttpFetcher {
    async fn get_json(
        &self,
        url: &str,
        query: Vec<(String, String)>,
    ) -> AppResult<serde_json::Value> {
        let response = self
            .http_client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let value = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| classify(url, e))?;

        tracing::debug!(url = %url, "Fetched JSON");

        Ok(value)
    }
}

fn classify(url: &str, error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::Timeout(url.to_string())
    } else {
        AppError::HttpClient(error.without_url())
    }
}
