//! Chat message rendering.
//!
//! Every message leaving the process goes through [`MessageFormatter::enforce_budget`],
//! so nothing exceeds the webhook's practical size limit.

use crate::models::{RunOutcome, Source};
use crate::utils::text::truncate_chars;

/// Appended when a message had to be cut to fit the budget.
pub const TRIMMED_MARKER: &str = "\n…(trimmed)";

pub const DEFAULT_MAX_CHARS: usize = 1900;

#[derive(Debug, Clone)]
pub struct MessageFormatter {
    max_chars: usize,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl MessageFormatter {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Render one source's outcome without applying the budget.
    pub fn format_section(&self, source: &Source, outcome: &RunOutcome) -> String {
        match outcome {
            RunOutcome::FetchError(reason) => format!(
                "🟠 **{} Radar Ran**\nFetch issue: **{}**\nLink: {}",
                source.label, reason, source.url
            ),
            RunOutcome::NotifyError(reason) => format!(
                "🔴 **{} Radar Notify Failed**\nWebhook issue: **{}**\nLink: {}",
                source.label, reason, source.url
            ),
            RunOutcome::Empty => format!(
                "🟢 **{} Radar Ran Successfully**\nNo clearance items found this run.\nLink: {}",
                source.label, source.url
            ),
            RunOutcome::ItemsFound(items) => {
                let bullets: Vec<String> = items
                    .iter()
                    .map(|item| {
                        format!("• **{}** — {}\n{}", item.formatted_price(), item.name, item.link)
                    })
                    .collect();
                format!(
                    "🔥 **{} Clearance Detected** 🔥\n\n{}",
                    source.label,
                    bullets.join("\n\n")
                )
            }
        }
    }

    /// A single source's message, ready to send.
    pub fn format_message(&self, source: &Source, outcome: &RunOutcome) -> String {
        self.enforce_budget(self.format_section(source, outcome))
    }

    /// Sections joined by blank lines, ready to send.
    pub fn aggregate<S: AsRef<str>>(&self, sections: &[S]) -> String {
        let joined = sections
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("\n\n");
        self.enforce_budget(joined)
    }

    /// Best-effort report for a run that failed as a whole.
    pub fn format_error(&self, error: &str) -> String {
        let detail = error.replace('`', "'");
        self.enforce_budget(format!("🔴 **Clearance Radar Error**\n`{}`", detail))
    }

    pub fn enforce_budget(&self, message: String) -> String {
        if message.chars().count() <= self.max_chars {
            return message;
        }
        let keep = self
            .max_chars
            .saturating_sub(TRIMMED_MARKER.chars().count());
        let mut trimmed = truncate_chars(&message, keep).trim_end().to_string();
        trimmed.push_str(TRIMMED_MARKER);
        trimmed
    }
}
