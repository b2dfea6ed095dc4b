//! Backend commands queued from UI to backend worker.

use shared::domain::PatternId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    RefreshPatterns,
    TogglePattern {
        id: PatternId,
        pattern_text: String,
        checked: bool,
    },
    SubmitMessage {
        text: String,
    },
    ResetSession,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RefreshPatterns => "refresh_patterns",
            Self::TogglePattern { .. } => "toggle_pattern",
            Self::SubmitMessage { .. } => "submit_message",
            Self::ResetSession => "reset_session",
        }
    }
}
