//! The surface front-ends drive: one [`ConsoleSession`] per user session.

use std::sync::Arc;

use shared::domain::{ChatMessage, PatternId, PatternRecord};
use tracing::{info, warn};

use crate::{
    completion::{AnthropicCompletionService, CompletionService, MissingCompletionService},
    config::Settings,
    conversation::ConversationController,
    error::{StoreUnavailable, SubmitError},
    selection::{SelectionController, ToggleOutcome},
    state::SessionState,
    store::{MissingPatternStore, PatternStore, SupabasePatternStore},
};

/// Owned copy of everything a renderer needs, safe to ship across threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub patterns: Vec<PatternRecord>,
    pub active_selection: Option<PatternId>,
    pub active_instruction: String,
    pub selection_stale: bool,
    pub messages: Vec<ChatMessage>,
}

impl SessionSnapshot {
    pub fn is_checked(&self, id: PatternId) -> bool {
        self.active_selection == Some(id)
    }

    pub fn active_pattern(&self) -> Option<&PatternRecord> {
        let id = self.active_selection?;
        self.patterns.iter().find(|pattern| pattern.id == id)
    }
}

pub struct ConsoleSession {
    state: SessionState,
    selection: SelectionController,
    conversation: ConversationController,
    store: Arc<dyn PatternStore>,
}

impl ConsoleSession {
    pub fn new(store: Arc<dyn PatternStore>, completion: Arc<dyn CompletionService>) -> Self {
        let state = SessionState::new();
        info!(session_id = %state.session_id(), "session started");
        Self {
            state,
            selection: SelectionController::new(),
            conversation: ConversationController::new(completion),
            store,
        }
    }

    /// Wires the Supabase store and Anthropic client from settings. Missing
    /// credentials do not fail construction; the affected calls report the
    /// problem when they are made.
    pub fn from_settings(settings: &Settings) -> Self {
        let store: Arc<dyn PatternStore> = match SupabasePatternStore::from_settings(&settings.supabase)
        {
            Ok(store) => Arc::new(store),
            Err(err) => {
                warn!("pattern store disabled: {err}");
                Arc::new(MissingPatternStore::new(err.reason))
            }
        };
        Self::with_store(store, settings)
    }

    /// Uses `store` for patterns and the settings' completion service.
    pub fn with_store(store: Arc<dyn PatternStore>, settings: &Settings) -> Self {
        let completion: Arc<dyn CompletionService> = if settings.anthropic.api_key.trim().is_empty()
        {
            warn!("completion service disabled: ANTHROPIC_API_KEY is not configured");
            Arc::new(MissingCompletionService::new(
                "ANTHROPIC_API_KEY is not configured",
            ))
        } else {
            match AnthropicCompletionService::from_settings(&settings.anthropic) {
                Ok(service) => Arc::new(service),
                Err(err) => {
                    warn!("completion service disabled: {err}");
                    Arc::new(MissingCompletionService::new(err.message))
                }
            }
        };
        Self::new(store, completion)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Refetches the pattern list. On failure the previous list is kept.
    pub async fn refresh_patterns(&mut self) -> Result<&[PatternRecord], StoreUnavailable> {
        match self.store.list_patterns().await {
            Ok(patterns) => {
                info!(
                    session_id = %self.state.session_id(),
                    count = patterns.len(),
                    "pattern list refreshed"
                );
                self.state.replace_patterns(patterns);
                Ok(self.state.patterns())
            }
            Err(err) => {
                warn!(session_id = %self.state.session_id(), "pattern refresh failed: {err}");
                Err(err)
            }
        }
    }

    pub fn toggle(&mut self, id: PatternId, pattern_text: &str, checked: bool) -> ToggleOutcome {
        self.selection
            .toggle(&mut self.state, id, pattern_text, checked)
    }

    /// Convenience for front-ends that address patterns by id only.
    pub fn toggle_by_id(&mut self, id: PatternId, checked: bool) -> ToggleOutcome {
        let Some(text) = self
            .state
            .pattern(id)
            .map(|pattern| pattern.pattern_text.clone())
        else {
            warn!(session_id = %self.state.session_id(), pattern_id = %id, "unknown pattern id");
            return ToggleOutcome::Ignored;
        };
        self.toggle(id, &text, checked)
    }

    pub fn is_checked(&self, id: PatternId) -> bool {
        self.selection.is_checked(&self.state, id)
    }

    pub fn active_instruction(&self) -> &str {
        self.selection.active_instruction(&self.state)
    }

    pub async fn submit(&mut self, user_text: &str) -> Result<String, SubmitError> {
        self.conversation.submit(&mut self.state, user_text).await
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            patterns: self.state.patterns().to_vec(),
            active_selection: self.state.active_selection(),
            active_instruction: self.state.active_instruction().to_string(),
            selection_stale: self.state.is_selection_stale(),
            messages: self.state.messages().to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
