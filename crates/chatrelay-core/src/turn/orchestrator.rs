//! Turn orchestrator driving one prompt through history assembly, the
//! generation call, and persistence.
//!
//! TurnOrchestrator is generic over `TurnRepository` and `GenerationClient`
//! so chatrelay-core never depends on chatrelay-infra. Which steps run is
//! decided by [`OrchestratorConfig`]; the single-turn relay and the persisted
//! multi-turn relay are the same code path with different flags.

use chatrelay_types::config::{HistorySource, OrchestratorConfig, ReplyFormat};
use chatrelay_types::error::{GenerationError, RepositoryError};
use chatrelay_types::generation::GenerationRequest;
use chatrelay_types::turn::{HistoryEntry, HistoryOrder, TurnRecord};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::generation::{GenerationClient, GenerationReply};
use crate::repository::turn::TurnRepository;
use crate::turn::history::expand_history;
use crate::turn::prompt::normalize_prompt;

/// Why a turn failed.
///
/// Callers render both variants the same way; the distinction exists for
/// logging.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("turn store error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of a successful turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The prompt actually sent, after normalization.
    pub prompt: String,
    pub generated_text: String,
    /// Full response body from the generation service.
    pub raw: Value,
    /// History to show the caller, chosen by [`HistorySource`].
    pub history: Vec<HistoryEntry>,
    /// The stored record, when persistence is enabled.
    pub persisted: Option<TurnRecord>,
}

/// Orchestrates one generation round-trip per submitted prompt.
pub struct TurnOrchestrator<R: TurnRepository, G: GenerationClient> {
    repo: R,
    client: G,
    config: OrchestratorConfig,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    reply_format: ReplyFormat,
}

impl<R: TurnRepository, G: GenerationClient> TurnOrchestrator<R, G> {
    /// Create a new orchestrator with the given store, client and behavior.
    pub fn new(repo: R, client: G, config: OrchestratorConfig) -> Self {
        Self {
            repo,
            client,
            config,
            max_tokens: None,
            temperature: None,
            reply_format: ReplyFormat::default(),
        }
    }

    /// Sampling parameters forwarded with every request when set.
    pub fn with_sampling(mut self, max_tokens: Option<u32>, temperature: Option<f64>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// How the generated text is read from the response body.
    pub fn with_reply_format(mut self, reply_format: ReplyFormat) -> Self {
        self.reply_format = reply_format;
        self
    }

    /// Access the turn repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Access the generation client.
    pub fn client(&self) -> &G {
        &self.client
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run one turn for a submitted `text` value.
    ///
    /// Steps: normalize the input, load the history window (if enabled),
    /// call the generation service once, validate the reply, append the turn
    /// (if enabled), and pick the history to return. Any failure after
    /// normalization aborts the turn; nothing is persisted unless the reply
    /// was valid.
    pub async fn run_turn(&self, input: Option<&Value>) -> Result<TurnOutcome, TurnError> {
        let prompt = normalize_prompt(input);

        let history = if self.config.include_history {
            let records = self
                .repo
                .recent_turns(self.config.history_window, HistoryOrder::ReverseChronological)
                .await?;
            Some(expand_history(&records))
        } else {
            None
        };

        let request = GenerationRequest {
            prompt: prompt.clone(),
            history,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(
            endpoint = self.client.endpoint(),
            history_len = request.history.as_ref().map_or(0, Vec::len),
            "Calling generation service"
        );

        let body = self.client.generate(&request).await?;
        info!(body = %body, "Generation service responded");

        let reply = GenerationReply::from_body(body, self.reply_format)?;

        let persisted = if self.config.persist {
            let record = self
                .repo
                .append_turn(&prompt, &reply.generated_text)
                .await?;
            info!(turn_id = %record.id, "Turn saved");
            Some(record)
        } else {
            None
        };

        let history = match self.config.history_source {
            HistorySource::Upstream => reply.history.clone().unwrap_or_default(),
            HistorySource::Local => self.display_history().await?,
        };

        Ok(TurnOutcome {
            prompt,
            generated_text: reply.generated_text,
            raw: reply.raw,
            history,
            persisted,
        })
    }

    /// History for the landing page: the newest window, oldest first.
    pub async fn display_history(&self) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let records = self
            .repo
            .recent_turns(self.config.history_window, HistoryOrder::Chronological)
            .await?;
        Ok(expand_history(&records))
    }

    /// The newest `limit` turns in chronological order.
    pub async fn recent_turns(&self, limit: usize) -> Result<Vec<TurnRecord>, RepositoryError> {
        self.repo.recent_turns(limit, HistoryOrder::Chronological).await
    }

    pub async fn count_turns(&self) -> Result<u64, RepositoryError> {
        self.repo.count_turns().await
    }

    /// Every stored turn record.
    pub async fn list_turns(&self) -> Result<Vec<TurnRecord>, RepositoryError> {
        let turns = self.repo.list_all().await?;
        debug!(count = turns.len(), "Listing turn records");
        Ok(turns)
    }
}
