use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

use crate::formatter::TRIMMED_MARKER;
use crate::models::Source;
use crate::plugins::extractors::{BUILTIN_SOURCES, builtin_definition};
use crate::utils::error::AppError;
use crate::Result;

/// Environment variable holding the webhook endpoint.
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub webhook: WebhookConfig,
    pub fetcher: FetcherConfig,
    pub runner: RunnerConfig,
    #[serde(default)]
    pub sources: HashMap<String, SourceOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Only ever taken from `DISCORD_WEBHOOK_URL`, never from files.
    #[serde(skip)]
    pub url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub deadline_secs: u64,
    pub dispatch: DispatchPolicy,
    pub max_message_chars: usize,
    pub max_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceOverride {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub max_items: Option<usize>,
}

fn enabled_by_default() -> bool {
    true
}

/// How messages are dispatched during one run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// One message per source, sent as soon as that source completes.
    PerSource,
    /// One combined message after every source completes.
    Aggregate,
}

impl WebhookConfig {
    pub fn parsed_url(&self) -> Result<Url> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::config(format!("{} not set", WEBHOOK_ENV)))?;

        let url = Url::parse(raw)
            .map_err(|e| AppError::config(format!("Invalid webhook URL: {}", e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AppError::config(format!(
                "Webhook URL must be http(s), got {}",
                other
            ))),
        }
    }
}

impl AppConfig {
    /// Layer defaults, `config/default`, an optional explicit file and
    /// `RADAR__*` variables, attach the webhook variable, then validate.
    pub fn load(path: Option<&Path>, webhook_env: Option<String>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("webhook.timeout_secs", 10_i64)?
            .set_default("fetcher.user_agent", "Mozilla/5.0 (compatible) ClearanceRadar/1.0")?
            .set_default("fetcher.accept_language", "en-US,en;q=0.9")?
            .set_default("fetcher.timeout_secs", 20_i64)?
            .set_default("runner.deadline_secs", 60_i64)?
            .set_default("runner.dispatch", "per_source")?
            .set_default("runner.max_message_chars", 1900_i64)?
            .set_default("runner.max_items", 10_i64)?
            .add_source(File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("RADAR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.webhook.url = webhook_env;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.webhook.parsed_url()?;

        if self.webhook.timeout_secs == 0 {
            return Err(AppError::config("Webhook timeout must be greater than 0"));
        }

        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::config("Fetcher timeout must be greater than 0"));
        }

        if self.webhook.timeout_secs >= self.fetcher.timeout_secs {
            return Err(AppError::config(
                "Webhook timeout must be shorter than fetcher timeout",
            ));
        }

        if self.runner.deadline_secs <= self.fetcher.timeout_secs {
            return Err(AppError::config(
                "Run deadline must be longer than fetcher timeout",
            ));
        }

        if self.runner.max_items == 0 {
            return Err(AppError::config("Runner max_items must be greater than 0"));
        }

        if self.runner.max_message_chars <= TRIMMED_MARKER.chars().count() {
            return Err(AppError::config(
                "Runner max_message_chars is too small to hold a message",
            ));
        }

        for (id, source) in &self.sources {
            if builtin_definition(id).is_none() {
                return Err(AppError::config(format!("Unknown source override: {}", id)));
            }
            if let Some(url) = &source.url {
                Url::parse(url).map_err(|e| {
                    AppError::config(format!("Invalid URL for source {}: {}", id, e))
                })?;
            }
            if source.max_items == Some(0) {
                return Err(AppError::config(format!(
                    "Source {} max_items must be greater than 0",
                    id
                )));
            }
        }

        Ok(())
    }

    /// Built-in sources with overrides applied, in declaration order.
    ///
    /// A non-empty `only` restricts the run to those ids.
    pub fn resolve_sources(&self, only: &[String]) -> Result<Vec<Source>> {
        for id in only {
            if builtin_definition(id).is_none() {
                return Err(AppError::UnknownSource { id: id.clone() });
            }
        }

        let mut sources = Vec::new();
        for def in BUILTIN_SOURCES {
            if !only.is_empty() && !only.iter().any(|id| id == def.id) {
                continue;
            }
            let overrides = self.sources.get(def.id);
            if overrides.is_some_and(|o| !o.enabled) {
                tracing::info!(source = def.id, "source disabled by configuration");
                continue;
            }

            let url = overrides
                .and_then(|o| o.url.as_deref())
                .unwrap_or(def.listing_url);
            let max_items = overrides
                .and_then(|o| o.max_items)
                .unwrap_or(self.runner.max_items);

            sources.push(Source::new(def.id, def.label, Url::parse(url)?, max_items));
        }
        Ok(sources)
    }
}
