//! Turn orchestration: one submitted prompt becomes one generation
//! round-trip and, optionally, one persisted turn record.

pub mod history;
pub mod orchestrator;
pub mod prompt;

pub use history::expand_history;
pub use orchestrator::{TurnError, TurnOrchestrator, TurnOutcome};
pub use prompt::normalize_prompt;
