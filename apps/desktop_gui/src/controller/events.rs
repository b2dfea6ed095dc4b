//! UI/backend events and error modeling for desktop GUI controller.

use console_core::{FailureCause, SessionSnapshot, StoreUnavailable, SubmitError};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    Snapshot(SessionSnapshot),
    SubmissionFinished,
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    RateLimit,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadPatterns,
    SendMessage,
    General,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Authentication",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::RateLimit => "Rate limit",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Classifies free-form messages, e.g. startup failures or store errors
    /// whose only detail is the text.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("api key")
            || message_lower.contains("not configured")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("429") || message_lower.contains("rate limit") {
            UiErrorCategory::RateLimit
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("failed to reach")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_store(err: &StoreUnavailable) -> Self {
        Self::from_message(UiErrorContext::LoadPatterns, err.reason.clone())
    }

    pub fn from_submit(err: &SubmitError) -> Self {
        match err {
            SubmitError::NoPatternSelected => Self {
                category: UiErrorCategory::Validation,
                context: UiErrorContext::SendMessage,
                message: "Please select a pattern first.".to_string(),
            },
            SubmitError::CompletionFailed(failed) => Self {
                category: match failed.cause {
                    FailureCause::Auth => UiErrorCategory::Auth,
                    FailureCause::RateLimited => UiErrorCategory::RateLimit,
                    FailureCause::Transport => UiErrorCategory::Transport,
                    FailureCause::MalformedResponse => UiErrorCategory::Validation,
                    FailureCause::Api => UiErrorCategory::Unknown,
                },
                context: UiErrorContext::SendMessage,
                message: failed.message.clone(),
            },
        }
    }

    pub fn needs_key_check(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    /// One-line text for the status banner.
    pub fn banner_text(&self) -> String {
        let mut text = match self.context {
            UiErrorContext::SendMessage if self.category == UiErrorCategory::Validation => {
                self.message.clone()
            }
            UiErrorContext::BackendStartup => format!("Startup error: {}", self.message),
            UiErrorContext::LoadPatterns => format!("Could not load patterns: {}", self.message),
            _ => format!("{} error: {}", err_label(self.category), self.message),
        };
        if self.needs_key_check() {
            text.push_str(" Check the API keys in your settings.");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_core::CompletionFailed;

    #[test]
    fn missing_selection_is_a_validation_warning() {
        let err = UiError::from_submit(&SubmitError::NoPatternSelected);
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.banner_text(), "Please select a pattern first.");
    }

    #[test]
    fn completion_causes_map_to_categories() {
        let cases = [
            (FailureCause::Auth, UiErrorCategory::Auth),
            (FailureCause::RateLimited, UiErrorCategory::RateLimit),
            (FailureCause::Transport, UiErrorCategory::Transport),
            (FailureCause::MalformedResponse, UiErrorCategory::Validation),
            (FailureCause::Api, UiErrorCategory::Unknown),
        ];
        for (cause, expected) in cases {
            let err = UiError::from_submit(&SubmitError::CompletionFailed(CompletionFailed::new(
                cause, "boom",
            )));
            assert_eq!(err.category(), expected, "{cause}");
            assert_eq!(err.context(), UiErrorContext::SendMessage);
        }
    }

    #[test]
    fn auth_errors_hint_at_api_keys() {
        let err = UiError::from_submit(&SubmitError::CompletionFailed(CompletionFailed::new(
            FailureCause::Auth,
            "invalid x-api-key",
        )));
        assert!(err.needs_key_check());
        assert!(err.banner_text().ends_with("Check the API keys in your settings."));
    }

    #[test]
    fn store_failures_are_classified_from_their_reason() {
        let unconfigured =
            UiError::from_store(&StoreUnavailable::new("SUPABASE_URL is not configured"));
        assert_eq!(unconfigured.category(), UiErrorCategory::Auth);
        assert_eq!(unconfigured.context(), UiErrorContext::LoadPatterns);

        let unreachable = UiError::from_store(&StoreUnavailable::new(
            "failed to reach pattern store: connection refused",
        ));
        assert_eq!(unreachable.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn queue_disconnect_is_a_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(!err.needs_key_check());
    }
}
