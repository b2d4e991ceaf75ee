use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::WebhookConfig;
use crate::plugins::traits::Notifier;
use crate::utils::error::AppError;
use crate::utils::text::truncate_chars;
use crate::Result;

// Longest slice of a rejection body kept for logs.
const MAX_REASON_CHARS: usize = 300;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

pub struct DiscordNotifier {
    client: Client,
    webhook_url: Url,
    timeout: Duration,
}

impl DiscordNotifier {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let webhook_url = config.parsed_url()?;
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            webhook_url,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn post(&self, content: &str) -> Result<()> {
        let started = Instant::now();
        let response = self
            .client
            .post(self.webhook_url.clone())
            .timeout(self.timeout)
            .json(&WebhookPayload { content })
            .send()
            .await
            .map_err(|e| AppError::Notify {
                status: None,
                message: if e.is_timeout() {
                    "webhook request timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notify {
                status: Some(status.as_u16()),
                message: truncate_chars(body.trim(), MAX_REASON_CHARS).to_string(),
            });
        }

        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "webhook accepted message"
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, content: &str, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled("webhook post")),
            result = self.post(content) => result,
        }
    }
}
