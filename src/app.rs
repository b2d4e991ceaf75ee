//! Command-line surface: one invocation is one radar run.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, DispatchPolicy};
use crate::formatter::MessageFormatter;
use crate::plugins::extractors::BUILTIN_SOURCES;
use crate::plugins::notifiers::DiscordNotifier;
use crate::plugins::traits::Notifier;
use crate::plugins::ExtractorRegistry;
use crate::runner::{RunReport, RunStatus, Runner};
use crate::scraper::HttpFetcher;
use crate::Result;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "clearance-radar", version, about = "Posts retail clearance listings to a chat webhook")]
pub struct Cli {
    /// Extra configuration file layered over config/default.toml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only check these sources (repeatable)
    #[arg(long = "only", value_name = "SOURCE")]
    pub only: Vec<String>,

    /// Override the configured dispatch policy
    #[arg(long, value_enum)]
    pub dispatch: Option<DispatchPolicy>,

    /// Print the built-in sources and exit
    #[arg(long)]
    pub list_sources: bool,
}

/// Run the radar once and return the process exit code.
pub async fn execute(cli: Cli, webhook_env: Option<String>) -> u8 {
    if cli.list_sources {
        for def in BUILTIN_SOURCES {
            println!("{}\t{}\t{}", def.id, def.label, def.listing_url);
        }
        return 0;
    }

    let mut config = match AppConfig::load(cli.config.as_deref(), webhook_env) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "configuration rejected");
            return 1;
        }
    };
    if let Some(dispatch) = cli.dispatch {
        config.runner.dispatch = dispatch;
    }

    // A valid config always carries a usable webhook.
    let notifier: Arc<dyn Notifier> = match DiscordNotifier::new(&config.webhook) {
        Ok(notifier) => Arc::new(notifier),
        Err(e) => {
            tracing::error!(error = %e, "webhook client could not be built");
            return 1;
        }
    };
    let formatter = MessageFormatter::new(config.runner.max_message_chars);

    let result = match build_runner(&config, &cli.only, Arc::clone(&notifier), formatter.clone()) {
        Ok(runner) => runner.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => finish(report, notifier.as_ref(), &formatter).await,
        Err(e) => {
            tracing::error!(error = %e, "radar run failed");
            report_failure(notifier.as_ref(), &formatter, &e.to_string()).await;
            1
        }
    }
}

fn build_runner(
    config: &AppConfig,
    only: &[String],
    notifier: Arc<dyn Notifier>,
    formatter: MessageFormatter,
) -> Result<Runner> {
    let registry = ExtractorRegistry::with_builtin()?;
    let sources = config.resolve_sources(only)?;
    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);

    Ok(Runner::new(sources, &registry, fetcher, notifier)?
        .with_formatter(formatter)
        .with_dispatch(config.runner.dispatch)
        .with_deadline(Duration::from_secs(config.runner.deadline_secs)))
}

async fn finish(report: RunReport, notifier: &dyn Notifier, formatter: &MessageFormatter) -> u8 {
    for source in &report.sources {
        tracing::info!(
            source = %source.source_id,
            items = source.outcome.item_count(),
            failed = source.outcome.is_error(),
            "source summary"
        );
    }

    if report.status == RunStatus::NotifyFailed {
        let reason = report.notify_errors.join("; ");
        report_failure(notifier, formatter, &reason).await;
    }

    report.exit_code()
}

/// Best-effort error post on a fresh token; its own failure is only logged.
async fn report_failure(notifier: &dyn Notifier, formatter: &MessageFormatter, reason: &str) {
    let message = formatter.format_error(reason);
    if let Err(e) = notifier.send(&message, &CancellationToken::new()).await {
        tracing::warn!(error = %e, "could not report failure to webhook");
    }
}
