use std::time::Duration;

use clap::{Args, ValueEnum};
use eyre::Result;

use crate::cli::chat::controller::FailurePolicy;
use crate::response_provider::{CannedResponder, DEFAULT_REPLY, DEFAULT_REPLY_DELAY};

/// How one-shot mode prints the finished transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct ChatArgs {
    /// Send a single query, print the transcript and exit
    #[arg(short, long)]
    pub input: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Delay before the assistant reply arrives, in milliseconds
    #[arg(
        long,
        env = "CUTM_CHAT_REPLY_DELAY_MS",
        default_value_t = DEFAULT_REPLY_DELAY.as_millis() as u64
    )]
    pub reply_delay_ms: u64,

    /// Text of the placeholder assistant reply
    #[arg(long, env = "CUTM_CHAT_REPLY_TEXT")]
    pub reply_text: Option<String>,

    /// What to record when a reply cannot be generated
    #[arg(long, value_enum, default_value_t = FailurePolicy::ErrorEntry)]
    pub on_failure: FailurePolicy,

    /// Output format for --input
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

/// Settings for one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub reply_delay: Duration,
    pub reply_text: String,
    pub failure_policy: FailurePolicy,
    pub format: OutputFormat,
}

impl ChatConfig {
    pub fn responder(&self) -> Result<CannedResponder> {
        CannedResponder::new(self.reply_text.clone(), self.reply_delay)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
            reply_text: DEFAULT_REPLY.to_string(),
            failure_policy: FailurePolicy::default(),
            format: OutputFormat::default(),
        }
    }
}

impl From<&ChatArgs> for ChatConfig {
    fn from(args: &ChatArgs) -> Self {
        Self {
            reply_delay: Duration::from_millis(args.reply_delay_ms),
            reply_text: args.reply_text.clone().unwrap_or_else(|| DEFAULT_REPLY.to_string()),
            failure_policy: args.on_failure,
            format: args.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_reply_text_is_rejected() {
        let config = ChatConfig {
            reply_text: " ".to_string(),
            ..Default::default()
        };
        assert!(config.responder().is_err());
    }

    #[test]
    fn test_default_responder_uses_placeholder_delay() {
        let responder = ChatConfig::default().responder().unwrap();
        assert_eq!(responder.delay(), Duration::from_millis(1500));
    }
}
