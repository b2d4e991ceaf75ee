use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::FetcherConfig;
use crate::utils::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
    pub response_time_ms: u64,
}

/// Why a listing page could not be fetched.
///
/// `Display` is the reason text shown in chat.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("{0}")]
    Status(u16),

    #[error("timeout_or_block")]
    TimeoutOrBlocked(String),
}

impl FetchError {
    pub fn detail(&self) -> String {
        match self {
            FetchError::Status(status) => format!("HTTP {}", status),
            FetchError::TimeoutOrBlocked(detail) => detail.clone(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// One GET. Every failure comes back as a [`FetchError`].
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<FetchedPage, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| AppError::config(format!("Invalid accept_language: {}", e)))?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::TimeoutOrBlocked(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::TimeoutOrBlocked(e.to_string()))?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
            response_time_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<FetchedPage, FetchError> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::TimeoutOrBlocked("run cancelled".to_string())),
            result = self.get(url) => result,
        };

        match &result {
            Ok(page) => tracing::debug!(
                url = %url,
                status = page.status,
                bytes = page.body.len(),
                elapsed_ms = page.response_time_ms,
                "fetched listing page"
            ),
            Err(e) => tracing::warn!(url = %url, reason = %e.detail(), "listing fetch failed"),
        }
        result
    }
}
