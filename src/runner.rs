use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::DispatchPolicy;
use crate::formatter::MessageFormatter;
use crate::models::{RunOutcome, Source};
use crate::plugins::manager::{ExtractorHandle, ExtractorRegistry};
use crate::plugins::traits::{ListingExtractor, Notifier};
use crate::scraper::PageFetcher;
use crate::utils::error::AppError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every source produced an outcome and every message was accepted.
    Completed,
    /// Some sources failed to fetch but every message was accepted.
    CompletedWithErrors,
    /// At least one message was rejected by the webhook.
    NotifyFailed,
    /// The run deadline fired before the run finished.
    DeadlineExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source_id: String,
    pub label: String,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub sources: Vec<SourceReport>,
    /// Webhook failure reasons, one per rejected message.
    pub notify_errors: Vec<String>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn exit_code(&self) -> u8 {
        match self.status {
            RunStatus::Completed | RunStatus::CompletedWithErrors => 0,
            RunStatus::NotifyFailed | RunStatus::DeadlineExceeded => 1,
        }
    }
}

struct PlannedSource {
    source: Source,
    extractor: ExtractorHandle,
}

/// Sequences fetch, extract, format and notify for every configured source.
pub struct Runner {
    plan: Vec<PlannedSource>,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
    formatter: MessageFormatter,
    dispatch: DispatchPolicy,
    deadline: Duration,
}

impl Runner {
    pub fn new(
        sources: Vec<Source>,
        registry: &ExtractorRegistry,
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let plan = sources
            .into_iter()
            .map(|source| {
                let extractor = registry.get(&source.id)?;
                Ok(PlannedSource { source, extractor })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            plan,
            fetcher,
            notifier,
            formatter: MessageFormatter::default(),
            dispatch: DispatchPolicy::PerSource,
            deadline: Duration::from_secs(60),
        })
    }

    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchPolicy) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Run every source once under the run deadline.
    ///
    /// Per-source failures end up in the report; `Err` is reserved for
    /// failures of the run machinery itself.
    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        let cancel = CancellationToken::new();
        tracing::info!(
            sources = self.plan.len(),
            dispatch = ?self.dispatch,
            deadline_secs = self.deadline.as_secs(),
            "starting radar run"
        );

        let dispatched = match self.dispatch {
            DispatchPolicy::PerSource => {
                tokio::time::timeout(self.deadline, self.run_per_source(&cancel)).await
            }
            DispatchPolicy::Aggregate => {
                tokio::time::timeout(self.deadline, self.run_aggregate(&cancel)).await
            }
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (sources, notify_errors) = match dispatched {
            Ok(result) => result?,
            Err(_) => {
                cancel.cancel();
                tracing::error!(elapsed_ms, "hard timeout hit, aborting run");
                return Ok(RunReport {
                    status: RunStatus::DeadlineExceeded,
                    sources: Vec::new(),
                    notify_errors: Vec::new(),
                    elapsed_ms,
                });
            }
        };

        let status = if !notify_errors.is_empty() {
            RunStatus::NotifyFailed
        } else if sources.iter().any(|r| r.outcome.is_error()) {
            RunStatus::CompletedWithErrors
        } else {
            RunStatus::Completed
        };
        tracing::info!(?status, elapsed_ms, "radar run finished");

        Ok(RunReport {
            status,
            sources,
            notify_errors,
            elapsed_ms,
        })
    }

    async fn run_per_source(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(Vec<SourceReport>, Vec<String>)> {
        let mut reports = Vec::with_capacity(self.plan.len());
        let mut notify_errors = Vec::new();

        for planned in &self.plan {
            let source = &planned.source;
            let outcome = check_source(
                self.fetcher.as_ref(),
                source,
                Arc::clone(&planned.extractor),
                cancel,
            )
            .await?;
            let message = self.formatter.format_message(source, &outcome);

            let outcome = match self.notifier.send(&message, cancel).await {
                Ok(()) => outcome,
                Err(e) => {
                    tracing::error!(source = %source.id, error = %e, "webhook post failed");
                    notify_errors.push(e.to_string());
                    RunOutcome::NotifyError(e.to_string())
                }
            };
            reports.push(report_for(source, outcome));
        }

        Ok((reports, notify_errors))
    }

    async fn run_aggregate(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(Vec<SourceReport>, Vec<String>)> {
        // Fan out; one source failing never cancels the others.
        let handles: Vec<_> = self
            .plan
            .iter()
            .map(|planned| {
                let fetcher = Arc::clone(&self.fetcher);
                let extractor = Arc::clone(&planned.extractor);
                let source = planned.source.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    check_source(fetcher.as_ref(), &source, extractor, &cancel).await
                })
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (planned, joined) in self.plan.iter().zip(join_all(handles).await) {
            let outcome = joined.map_err(|e| {
                AppError::Internal(format!("source task {} failed: {}", planned.source.id, e))
            })??;
            reports.push(report_for(&planned.source, outcome));
        }

        let sections: Vec<String> = self
            .plan
            .iter()
            .zip(&reports)
            .map(|(planned, report)| self.formatter.format_section(&planned.source, &report.outcome))
            .collect();
        let message = self.formatter.aggregate(&sections);

        let mut notify_errors = Vec::new();
        if let Err(e) = self.notifier.send(&message, cancel).await {
            tracing::error!(error = %e, "webhook post failed");
            notify_errors.push(e.to_string());
        }

        Ok((reports, notify_errors))
    }
}

fn report_for(source: &Source, outcome: RunOutcome) -> SourceReport {
    SourceReport {
        source_id: source.id.clone(),
        label: source.label.clone(),
        outcome,
    }
}

async fn check_source(
    fetcher: &dyn PageFetcher,
    source: &Source,
    extractor: ExtractorHandle,
    cancel: &CancellationToken,
) -> Result<RunOutcome> {
    let page = match fetcher.fetch(&source.url, cancel).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(source = %source.id, reason = %e, "fetch issue");
            return Ok(RunOutcome::FetchError(e.to_string()));
        }
    };

    // Regex work runs off the runtime so the run deadline can still fire.
    let max_items = source.max_items;
    let body = page.body;
    let items = tokio::task::spawn_blocking(move || extractor.extract(&body, max_items))
        .await
        .map_err(|e| AppError::Internal(format!("extraction for {} failed: {}", source.id, e)))?;

    tracing::info!(
        source = %source.id,
        items = items.len(),
        elapsed_ms = page.response_time_ms,
        "source checked"
    );
    Ok(RunOutcome::from_items(items))
}
