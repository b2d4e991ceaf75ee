use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::Result;

/// Delivers a composed message to a chat channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Exactly one outbound call, no retry. Gives up as soon as `cancel` fires.
    async fn send(&self, content: &str, cancel: &CancellationToken) -> Result<()>;
}
