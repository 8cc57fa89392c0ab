use std::time::Duration;

use perusal_core::error::AppError;
use perusal_core::traits::Fetcher;
use reqwest::{Client, Response};
use url::Url;

const USER_AGENT: &str = concat!("Perusal/", env!("CARGO_PKG_VERSION"), " (reading-time estimator)");

/// HTTP fetcher using reqwest.
///
/// Serves both HTML pages and binary document downloads with a shared
/// client, so connections are pooled across every resource in a run.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout,
        })
    }

    async fn send(&self, url: &str) -> Result<Response, AppError> {
        check_scheme(url)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        Ok(response)
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.send(url)
            .await?
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let bytes = self
            .send(url)
            .await?
            .bytes()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))?;

        tracing::debug!(%url, bytes = bytes.len(), "Downloaded body");
        Ok(bytes.to_vec())
    }
}

/// Only `http` and `https` URLs are fetched.
fn check_scheme(url: &str) -> Result<(), AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::HttpError(format!(
            "URL scheme '{scheme}' is not allowed (only http/https)"
        ))),
    }
}
