use std::sync::Arc;

use shared::domain::ChatMessage;
use tracing::{info, warn};

use crate::{completion::CompletionService, error::SubmitError, state::SessionState};

/// Owns the message log protocol: validate, append the user turn, call the
/// completion service, append the reply.
#[derive(Clone)]
pub struct ConversationController {
    completion: Arc<dyn CompletionService>,
}

impl ConversationController {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Sends `user_text` under the active instruction.
    ///
    /// Holds `state` mutably across the remote call, so a second submission on
    /// the same session cannot start until this one returns. On a completion
    /// failure the user turn stays in history and no assistant turn is added.
    pub async fn submit(
        &self,
        state: &mut SessionState,
        user_text: &str,
    ) -> Result<String, SubmitError> {
        if state.active_instruction().is_empty() {
            info!(
                session_id = %state.session_id(),
                "rejecting message: no pattern selected"
            );
            return Err(SubmitError::NoPatternSelected);
        }

        let instruction = state.active_instruction().to_string();
        state.push_message(ChatMessage::user(user_text));

        match self.completion.complete(&instruction, user_text).await {
            Ok(reply) => {
                state.push_message(ChatMessage::assistant(reply.clone()));
                info!(
                    session_id = %state.session_id(),
                    pattern_id = ?state.active_selection(),
                    message_count = state.messages().len(),
                    "assistant reply appended"
                );
                Ok(reply)
            }
            Err(err) => {
                warn!(
                    session_id = %state.session_id(),
                    cause = %err.cause,
                    "completion failed: {}",
                    err.message
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
