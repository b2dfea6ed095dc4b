//! Per-session state shared by the selection and conversation controllers.
//!
//! The controllers never talk to each other; the selection controller writes the
//! active selection here and the conversation controller reads it back.

use shared::domain::{ChatMessage, PatternId, PatternRecord};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionState {
    session_id: Uuid,
    patterns: Vec<PatternRecord>,
    active_selection: Option<PatternId>,
    active_instruction: String,
    // Set when a refetch no longer contains the selected id. The id is kept
    // until the next toggle but reads as no selection in the meantime.
    selection_stale: bool,
    messages: Vec<ChatMessage>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            patterns: Vec::new(),
            active_selection: None,
            active_instruction: String::new(),
            selection_stale: false,
            messages: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The pattern list from the last successful fetch.
    pub fn patterns(&self) -> &[PatternRecord] {
        &self.patterns
    }

    pub fn pattern(&self, id: PatternId) -> Option<&PatternRecord> {
        self.patterns.iter().find(|pattern| pattern.id == id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Effective selection: `None` while the selection is stale.
    pub fn active_selection(&self) -> Option<PatternId> {
        if self.selection_stale {
            None
        } else {
            self.active_selection
        }
    }

    /// Effective instruction: empty while there is no effective selection.
    pub fn active_instruction(&self) -> &str {
        if self.selection_stale {
            ""
        } else {
            &self.active_instruction
        }
    }

    /// The selected id as last set by a toggle, even if a refetch dropped it.
    pub fn recorded_selection(&self) -> Option<PatternId> {
        self.active_selection
    }

    pub fn is_selection_stale(&self) -> bool {
        self.selection_stale
    }

    /// Starts a new session. The fetched pattern list survives; selection and
    /// history do not.
    pub fn reset(&mut self) {
        let previous = self.session_id;
        self.session_id = Uuid::new_v4();
        self.active_selection = None;
        self.active_instruction.clear();
        self.selection_stale = false;
        self.messages.clear();
        info!(
            previous_session_id = %previous,
            session_id = %self.session_id,
            "session reset"
        );
    }

    pub(crate) fn replace_patterns(&mut self, patterns: Vec<PatternRecord>) {
        self.patterns = patterns;
        let Some(selected) = self.active_selection else {
            return;
        };

        match self.patterns.iter().find(|pattern| pattern.id == selected) {
            Some(record) => {
                self.active_instruction.clone_from(&record.pattern_text);
                self.selection_stale = false;
            }
            None => {
                if !self.selection_stale {
                    debug!(
                        session_id = %self.session_id,
                        pattern_id = %selected,
                        "selected pattern missing from refreshed list; selection is stale"
                    );
                }
                self.selection_stale = true;
            }
        }
    }

    pub(crate) fn select(&mut self, id: PatternId, instruction: &str) {
        self.active_selection = Some(id);
        self.active_instruction = instruction.to_string();
        self.selection_stale = false;
    }

    pub(crate) fn clear_selection(&mut self) {
        self.active_selection = None;
        self.active_instruction.clear();
        self.selection_stale = false;
    }

    pub(crate) fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}
