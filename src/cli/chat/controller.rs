use std::sync::Arc;

use clap::ValueEnum;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use super::conversation_state::{ConversationSnapshot, ConversationState, Message};
use super::error::ChatError;
use super::suggestions::{SUGGESTED_QUERIES, suggested_query};
use crate::response_provider::{ProviderError, ResponseProvider};

/// What happens to the transcript when the provider fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Append an assistant entry flagged as an error.
    #[default]
    ErrorEntry,
    /// Append nothing; only the pending flag is cleared.
    Discard,
}

/// Result of a call to [`ConversationController::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The query was appended and a reply requested.
    Accepted,
    /// The pending input was blank; nothing changed.
    Empty,
    /// A reply is still outstanding; nothing changed.
    Busy,
}

/// How an outstanding turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied,
    Failed(ProviderError),
}

type ReplyTask = JoinHandle<Result<String, ProviderError>>;

/// Owns the [`ConversationState`] and serializes turns against a
/// [`ResponseProvider`].
///
/// At most one reply is in flight at a time. The reply runs as a spawned task
/// and is applied only through [`await_reply`](Self::await_reply), so every
/// mutation goes through `&mut self`. Dropping the controller aborts an
/// outstanding reply.
pub struct ConversationController {
    state: ConversationState,
    provider: Arc<dyn ResponseProvider>,
    failure_policy: FailurePolicy,
    in_flight: Option<ReplyTask>,
}

impl ConversationController {
    pub fn new(provider: Arc<dyn ResponseProvider>, failure_policy: FailurePolicy) -> Self {
        Self {
            state: ConversationState::new(),
            provider,
            failure_policy,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        self.state.snapshot()
    }

    /// The suggested queries, offered only until the first message exists.
    pub fn suggested_queries(&self) -> Option<&'static [&'static str]> {
        self.state.is_empty().then_some(&SUGGESTED_QUERIES[..])
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.state.set_pending_input(text.into());
    }

    /// Copies `query` into the input buffer without submitting it.
    ///
    /// Inert once the conversation has started; returns whether the buffer
    /// was updated.
    pub fn select_suggested_query(&mut self, query: &str) -> bool {
        if !self.state.is_empty() {
            debug!("Ignoring suggested query, conversation already started");
            return false;
        }

        self.state.set_pending_input(query.to_string());
        true
    }

    pub fn select_suggestion(&mut self, index: usize) -> Result<bool, ChatError> {
        let query = suggested_query(index).ok_or(ChatError::UnknownSuggestion(index))?;
        Ok(self.select_suggested_query(query))
    }

    /// Submits the pending input and requests a reply in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.state.awaiting_response() {
            debug!("Rejecting submission while a reply is outstanding");
            return SubmitOutcome::Busy;
        }

        let Some(query) = self.state.begin_turn() else {
            debug!("Ignoring blank submission");
            return SubmitOutcome::Empty;
        };

        // Per-turn logs stay at debug: the terminal shares stderr with the transcript.
        debug!(turn = self.state.transcript().len(), "Requesting reply");
        let provider = Arc::clone(&self.provider);
        let task = tokio::spawn(async move { provider.generate_reply(&query).await });
        self.in_flight = Some(task);

        SubmitOutcome::Accepted
    }

    /// Waits for the outstanding reply and applies it.
    ///
    /// Returns `None` when nothing is in flight. Cancel safe: dropping the
    /// returned future leaves the request outstanding.
    pub async fn await_reply(&mut self) -> Option<TurnOutcome> {
        let result = self.in_flight.as_mut()?.await;
        self.in_flight = None;
        Some(self.complete_turn(result))
    }

    fn complete_turn(
        &mut self,
        result: Result<Result<String, ProviderError>, JoinError>,
    ) -> TurnOutcome {
        let reply = result
            .map_err(|e| ProviderError::Interrupted(e.to_string()))
            .and_then(std::convert::identity)
            .and_then(|text| Message::assistant(text).map_err(|_| ProviderError::EmptyReply));

        match reply {
            Ok(message) => {
                self.state.finish_turn(Some(message));
                debug!(turn = self.state.transcript().len(), "Reply received");
                TurnOutcome::Replied
            }
            Err(err) => {
                debug!(error = %err, "Reply generation failed");
                let entry = match self.failure_policy {
                    FailurePolicy::ErrorEntry => {
                        Message::assistant_error(format!("Unable to generate a reply: {err}")).ok()
                    }
                    FailurePolicy::Discard => None,
                };
                self.state.finish_turn(entry);
                TurnOutcome::Failed(err)
            }
        }
    }
}

impl Drop for ConversationController {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            debug!("Discarding outstanding reply");
            task.abort();
        }
    }
}
