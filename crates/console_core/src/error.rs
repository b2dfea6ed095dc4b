//! Error taxonomy surfaced to front-ends. None of these are fatal to a session.

use std::fmt;

use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pattern store unavailable: {reason}")]
pub struct StoreUnavailable {
    pub reason: String,
}

impl StoreUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Transport,
    Auth,
    RateLimited,
    Api,
    MalformedResponse,
}

impl FailureCause {
    pub fn label(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Auth => "auth",
            Self::RateLimited => "rate-limited",
            Self::Api => "api",
            Self::MalformedResponse => "malformed response",
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<ErrorCode> for FailureCause {
    fn from(code: ErrorCode) -> Self {
        if code.is_auth() {
            return Self::Auth;
        }
        match code {
            ErrorCode::RateLimited => Self::RateLimited,
            _ => Self::Api,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("completion failed ({cause}): {message}")]
pub struct CompletionFailed {
    pub cause: FailureCause,
    pub message: String,
}

impl CompletionFailed {
    pub fn new(cause: FailureCause, message: impl Into<String>) -> Self {
        Self {
            cause,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureCause::Transport, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureCause::MalformedResponse, message)
    }
}

impl From<ApiError> for CompletionFailed {
    fn from(err: ApiError) -> Self {
        Self::new(err.code.into(), err.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no pattern selected; pick a pattern before sending a message")]
    NoPatternSelected,
    #[error(transparent)]
    CompletionFailed(#[from] CompletionFailed),
}
