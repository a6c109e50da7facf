//! GenerationClient trait and validation of the service's reply.
//!
//! The client returns the raw JSON body of a successful (2xx) call. Whether
//! that body counts as a successful generation is decided here by
//! [`GenerationReply::from_body`], not by the transport.

use chatrelay_types::config::ReplyFormat;
use chatrelay_types::error::GenerationError;
use chatrelay_types::generation::GenerationRequest;
use chatrelay_types::turn::HistoryEntry;
use serde_json::Value;
use tracing::warn;

/// Outbound adapter for the remote text-generation endpoint.
///
/// One attempt per call: no retry, no timeout. Implementations live in
/// chatrelay-infra (e.g., `HttpGenerationClient`).
pub trait GenerationClient: Send + Sync {
    /// URL the client posts to, for logging.
    fn endpoint(&self) -> &str;

    /// Send one generation request and return the parsed JSON body.
    ///
    /// Transport failures, non-2xx statuses and non-JSON bodies are errors.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<Value, GenerationError>> + Send;
}

/// A reply that passed validation.
#[derive(Debug, Clone)]
pub struct GenerationReply {
    pub generated_text: String,
    /// The `history` field as echoed by the service, if present and well-formed.
    pub history: Option<Vec<HistoryEntry>>,
    /// The full body, exposed to callers for display.
    pub raw: Value,
}

impl GenerationReply {
    /// Validate a response body.
    ///
    /// Succeeds only when the text selected by `format` is a non-empty
    /// string. A malformed `history` field does not fail the turn; it is
    /// dropped with a warning.
    pub fn from_body(raw: Value, format: ReplyFormat) -> Result<Self, GenerationError> {
        let generated_text = match format {
            ReplyFormat::GeneratedText => match raw.get("generated_text") {
                Some(Value::String(text)) if !text.is_empty() => text.clone(),
                _ => return Err(GenerationError::MissingGeneratedText),
            },
            ReplyFormat::Choices => match raw.pointer("/choices/0/text") {
                Some(Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
                _ => return Err(GenerationError::MissingGeneratedText),
            },
        };

        let history = match raw.get("history") {
            None | Some(Value::Null) => None,
            Some(value) => match serde_json::from_value::<Vec<HistoryEntry>>(value.clone()) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    warn!(error = %e, "Ignoring malformed history in generation response");
                    None
                }
            },
        };

        Ok(Self {
            generated_text,
            history,
            raw,
        })
    }
}
