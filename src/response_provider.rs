use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, eyre};
use thiserror::Error;
use tracing::debug;

/// Placeholder reply returned until a real answer backend is wired in.
pub const DEFAULT_REPLY: &str = "Thank you for your query. CUTM (Centurion University of Technology and Management) is committed to providing quality education and fostering innovation. We offer various programs across different disciplines including Engineering, Management, Agriculture, Applied Sciences, and more. Our state-of-the-art facilities and experienced faculty ensure that students receive the best possible education to prepare them for their future careers.";

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);

/// Failure modes of reply generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("the provider returned an empty reply")]
    EmptyReply,
    #[error("the reply task was interrupted: {0}")]
    Interrupted(String),
}

/// Produces the assistant's reply for a submitted query.
///
/// The conversation controller awaits this without looking inside, so a
/// real backend can replace the canned one without touching the controller.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    async fn generate_reply(&self, query: &str) -> Result<String, ProviderError>;
}

/// Ignores the query and answers with a fixed text after a fixed delay.
#[derive(Debug, Clone)]
pub struct CannedResponder {
    reply: String,
    delay: Duration,
}

impl CannedResponder {
    pub fn new(reply: impl Into<String>, delay: Duration) -> Result<Self> {
        let reply = reply.into();
        if reply.trim().is_empty() {
            return Err(eyre!("Canned reply text cannot be empty"));
        }

        Ok(Self { reply, delay })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self {
            reply: DEFAULT_REPLY.to_string(),
            delay: DEFAULT_REPLY_DELAY,
        }
    }
}

#[async_trait]
impl ResponseProvider for CannedResponder {
    async fn generate_reply(&self, query: &str) -> Result<String, ProviderError> {
        debug!(
            query_len = query.len(),
            delay_ms = self.delay.as_millis() as u64,
            "Composing canned reply"
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}
