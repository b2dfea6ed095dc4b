//! Single-select state machine over the pattern list.
//!
//! Front-ends render one independent checkbox per pattern and forward every
//! change here. The controller is the only source of truth for which box is
//! checked; renderers read [`SelectionController::is_checked`] back each frame.

use shared::domain::PatternId;
use tracing::{debug, info, warn};

use crate::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The pattern is now active. `displaced` is the previously active pattern
    /// whose checkbox must be shown unchecked.
    Selected { displaced: Option<PatternId> },
    /// The active pattern was unchecked; nothing is selected.
    Cleared,
    /// Stale or unknown event; the effective selection did not change.
    Ignored,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionController;

impl SelectionController {
    pub fn new() -> Self {
        Self
    }

    /// Applies a checkbox change. `checked` is the control's new logical state.
    pub fn toggle(
        &self,
        state: &mut SessionState,
        id: PatternId,
        pattern_text: &str,
        checked: bool,
    ) -> ToggleOutcome {
        if !state.patterns().is_empty() && state.pattern(id).is_none() {
            warn!(
                session_id = %state.session_id(),
                pattern_id = %id,
                "ignoring toggle for pattern not in the current list"
            );
            return ToggleOutcome::Ignored;
        }

        if state.is_selection_stale() {
            debug!(
                session_id = %state.session_id(),
                pattern_id = ?state.recorded_selection(),
                "dropping stale selection"
            );
            state.clear_selection();
        }

        let current = state.active_selection();
        if checked {
            let displaced = current.filter(|previous| *previous != id);
            // The loaded record is authoritative for its own text.
            let instruction = state
                .pattern(id)
                .map(|record| record.pattern_text.clone())
                .unwrap_or_else(|| pattern_text.to_string());
            state.select(id, &instruction);
            if current != Some(id) {
                info!(
                    session_id = %state.session_id(),
                    pattern_id = %id,
                    displaced = ?displaced,
                    "pattern selected"
                );
            }
            return ToggleOutcome::Selected { displaced };
        }

        if current == Some(id) {
            state.clear_selection();
            info!(session_id = %state.session_id(), pattern_id = %id, "pattern cleared");
            ToggleOutcome::Cleared
        } else {
            debug!(
                session_id = %state.session_id(),
                pattern_id = %id,
                active = ?current,
                "ignoring uncheck for inactive pattern"
            );
            ToggleOutcome::Ignored
        }
    }

    pub fn is_checked(&self, state: &SessionState, id: PatternId) -> bool {
        state.active_selection() == Some(id)
    }

    pub fn active_instruction<'a>(&self, state: &'a SessionState) -> &'a str {
        state.active_instruction()
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
