//! Request shape sent to the remote generation service.

use serde::{Deserialize, Serialize};

use crate::turn::HistoryEntry;

/// Body of the `POST` to the generation endpoint.
///
/// `history` is omitted entirely (not sent as `null`) for single-turn
/// calls. `max_tokens` and `temperature` are only sent when configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}
