//! Frame-independent view state, reduced from backend events.

use console_core::SessionSnapshot;

use crate::controller::events::{UiErrorCategory, UiErrorContext, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub severity: BannerSeverity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub snapshot: SessionSnapshot,
    pub status: String,
    pub banner: Option<StatusBanner>,
    pub submission_pending: bool,
    /// Text of the in-flight submission, shown until the worker's snapshot
    /// carries it.
    pub pending_prompt: Option<String>,
}

impl ViewState {
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::Snapshot(snapshot) => self.snapshot = snapshot,
            UiEvent::SubmissionFinished => {
                self.submission_pending = false;
                self.pending_prompt = None;
            }
            UiEvent::Error(err) => {
                let severity = if err.context() == UiErrorContext::SendMessage
                    && err.category() == UiErrorCategory::Validation
                {
                    BannerSeverity::Warning
                } else {
                    BannerSeverity::Error
                };
                self.status = err.banner_text();
                self.banner = Some(StatusBanner {
                    severity,
                    message: self.status.clone(),
                });
            }
        }
    }

    /// Marks a submission as in flight. Returns `false` if one already is.
    pub fn begin_submission(&mut self, prompt: &str) -> bool {
        if self.submission_pending {
            return false;
        }
        self.submission_pending = true;
        self.pending_prompt = Some(prompt.to_string());
        self.banner = None;
        true
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiError;
    use console_core::SubmitError;
    use shared::domain::{ChatMessage, PatternId, PatternRecord};

    #[test]
    fn second_submission_is_refused_while_pending() {
        let mut view = ViewState::default();

        assert!(view.begin_submission("first"));
        assert!(!view.begin_submission("second"));
        assert_eq!(view.pending_prompt.as_deref(), Some("first"));

        view.apply(UiEvent::SubmissionFinished);
        assert!(!view.submission_pending);
        assert!(view.pending_prompt.is_none());
        assert!(view.begin_submission("second"));
    }

    #[test]
    fn snapshots_replace_rendered_session() {
        let mut view = ViewState::default();
        let snapshot = SessionSnapshot {
            patterns: vec![PatternRecord::new(PatternId(2), "terse", "Be terse")],
            active_selection: Some(PatternId(2)),
            active_instruction: "Be terse".to_string(),
            selection_stale: false,
            messages: vec![ChatMessage::user("hi"), ChatMessage::assistant("Hello.")],
        };

        view.apply(UiEvent::Snapshot(snapshot.clone()));

        assert_eq!(view.snapshot, snapshot);
        assert!(view.snapshot.is_checked(PatternId(2)));
    }

    #[test]
    fn missing_selection_raises_a_warning_banner() {
        let mut view = ViewState::default();
        view.begin_submission("hello");

        view.apply(UiEvent::Error(UiError::from_submit(
            &SubmitError::NoPatternSelected,
        )));
        view.apply(UiEvent::SubmissionFinished);

        let banner = view.banner.clone().expect("banner");
        assert_eq!(banner.severity, BannerSeverity::Warning);
        assert_eq!(banner.message, "Please select a pattern first.");
        assert!(!view.submission_pending);

        view.dismiss_banner();
        assert!(view.banner.is_none());
    }

    #[test]
    fn startup_errors_raise_an_error_banner() {
        let mut view = ViewState::default();

        view.apply(UiEvent::Error(UiError::from_message(
            UiErrorContext::BackendStartup,
            "failed to build runtime",
        )));

        let banner = view.banner.expect("banner");
        assert_eq!(banner.severity, BannerSeverity::Error);
        assert!(banner.message.starts_with("Startup error"));
    }
}
