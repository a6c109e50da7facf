//! Turn records and the history entries derived from them.
//!
//! A [`TurnRecord`] is the unit of persistence: one prompt and the text the
//! generation service produced for it. [`HistoryEntry`] values are rebuilt
//! from records on every read and are never stored themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Fallback prompt used when the submitted text is absent, not a string,
/// or blank.
pub const FALLBACK_PROMPT: &str = "Tell me a fun fact about technology.";

/// Number of turn records in a history window unless configured otherwise.
pub const DEFAULT_HISTORY_WINDOW: usize = 5;

/// Role of a history entry.
///
/// Locally expanded history only ever contains `User` and `Assistant`;
/// `System` exists so history echoed back by the generation service can be
/// passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A role-tagged message in the shape the generation service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// One persisted prompt/response exchange.
///
/// Immutable once written. `timestamp` is assigned by the store at insert
/// time and never decreases across insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: Uuid,
    pub prompt: String,
    pub generated_text: String,
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    /// Expand this record into its `(user, assistant)` history pair.
    pub fn to_history_pair(&self) -> [HistoryEntry; 2] {
        [
            HistoryEntry::user(self.prompt.clone()),
            HistoryEntry::assistant(self.generated_text.clone()),
        ]
    }
}

/// Ordering of a recent-turns window.
///
/// Both orders select the same newest `n` records; they differ only in how
/// that window is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    /// Oldest record of the window first (page display).
    Chronological,
    /// Newest record first (window sent to the generation service).
    ReverseChronological,
}

impl Default for HistoryOrder {
    fn default() -> Self {
        HistoryOrder::ReverseChronological
    }
}
