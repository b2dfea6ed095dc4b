//! Session core for the pattern console: single pattern selection coupled to a
//! chat log, plus the pattern store and completion adapters it talks to.

pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod presentation;
pub mod selection;
pub mod session;
pub mod state;
pub mod store;

pub use completion::{AnthropicCompletionService, CompletionService, MissingCompletionService};
pub use config::{load_settings, resolve_config_path, Settings};
pub use conversation::ConversationController;
pub use error::{CompletionFailed, FailureCause, StoreUnavailable, SubmitError};
pub use selection::{SelectionController, ToggleOutcome};
pub use session::{ConsoleSession, SessionSnapshot};
pub use state::SessionState;
pub use store::{MissingPatternStore, PatternStore, StaticPatternStore, SupabasePatternStore};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
