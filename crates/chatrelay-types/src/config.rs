//! Configuration types for chatrelay.
//!
//! `RelayConfig` mirrors `chatrelay.toml`. Every field has a default except
//! the database URL, which must come from the file, the environment, or the
//! command line before the server starts.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::turn::DEFAULT_HISTORY_WINDOW;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default)]
    pub web: WebConfig,
}

impl RelayConfig {
    /// Check the fields that must be present and sane before serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.database.url.as_deref() {
            None => return Err(ConfigError::Missing("database.url")),
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Missing("database.url"));
            }
            Some(_) => {}
        }

        if self.generation.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "generation.endpoint",
                reason: "must not be empty".to_string(),
            });
        }

        if self.orchestrator.history_window == 0 {
            return Err(ConfigError::Invalid {
                field: "orchestrator.history_window",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Listener address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Turn record store connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://chatrelay.db?mode=rwc`. Required.
    pub url: Option<String>,
}

/// Remote generation endpoint.
///
/// The API key is not part of this struct. It is read from the environment only
/// and never written to or parsed from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Sent as `max_tokens` when set.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sent as `temperature` when set.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Where the generated text sits in the response body.
    #[serde(default)]
    pub reply_format: ReplyFormat,
}

/// Shape of a successful generation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyFormat {
    /// Top-level `generated_text` string.
    #[default]
    GeneratedText,
    /// Completions-style `choices[0].text`, trimmed.
    Choices,
}

fn default_endpoint() -> String {
    "http://localhost:8000/generate-text".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_tokens: None,
            temperature: None,
            reply_format: ReplyFormat::default(),
        }
    }
}

/// Where the history returned to the caller after a turn comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySource {
    /// The `history` field echoed by the generation service, verbatim.
    Upstream,
    /// Re-read from the turn store after the new turn is written.
    Local,
}

impl Default for HistorySource {
    fn default() -> Self {
        HistorySource::Upstream
    }
}

/// Behavior of the turn orchestrator.
///
/// `persist = false, include_history = false` is the plain single-turn relay;
/// the defaults give the persisted multi-turn relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_true")]
    pub persist: bool,
    #[serde(default = "default_true")]
    pub include_history: bool,
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default)]
    pub history_source: HistorySource,
}

fn default_true() -> bool {
    true
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            persist: true,
            include_history: true,
            history_window: DEFAULT_HISTORY_WINDOW,
            history_source: HistorySource::Upstream,
        }
    }
}

/// Static asset serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Directory served at `/` for unmatched paths, if it exists.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_static_dir() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}
