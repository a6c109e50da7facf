//! Input normalization for submitted prompts.

use chatrelay_types::turn::FALLBACK_PROMPT;
use serde_json::Value;

/// Normalize a submitted `text` value into the prompt to send.
///
/// Absent, non-string, and blank values are replaced by [`FALLBACK_PROMPT`].
/// Anything else is returned as submitted, untrimmed.
pub fn normalize_prompt(input: Option<&Value>) -> String {
    match input {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        _ => FALLBACK_PROMPT.to_string(),
    }
}
