//! Application state wiring the turn store, generation client and renderer.
//!
//! The orchestrator is generic over its store and client; AppState pins it to
//! the concrete infra implementations. Everything here is created once,
//! before the listener binds, and shared by clone for the process lifetime.

use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use chatrelay_core::turn::TurnOrchestrator;
use chatrelay_infra::generation::HttpGenerationClient;
use chatrelay_infra::sqlite::pool::DatabasePool;
use chatrelay_infra::sqlite::turn::SqliteTurnRepository;
use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ConfigError;

use crate::http::render::PageRenderer;

/// Orchestrator pinned to SQLite storage and the HTTP generation client.
pub type ConcreteOrchestrator = TurnOrchestrator<SqliteTurnRepository, HttpGenerationClient>;

/// Shared application state used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub renderer: Arc<PageRenderer>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Connect to the store (running migrations), build the generation
    /// client, and compile the page template.
    ///
    /// Any failure here is fatal for the process.
    pub async fn init(config: RelayConfig, api_key: Option<SecretString>) -> anyhow::Result<Self> {
        let db_url = config
            .database
            .url
            .as_deref()
            .ok_or(ConfigError::Missing("database.url"))?;

        let db_pool = DatabasePool::new(db_url)
            .await
            .with_context(|| format!("failed to open turn store at {db_url}"))?;

        let client = HttpGenerationClient::new(&config.generation, api_key)?;

        let orchestrator = TurnOrchestrator::new(
            SqliteTurnRepository::new(db_pool),
            client,
            config.orchestrator.clone(),
        )
        .with_sampling(config.generation.max_tokens, config.generation.temperature)
        .with_reply_format(config.generation.reply_format);

        let renderer = PageRenderer::new().context("failed to compile page template")?;

        tracing::info!(
            endpoint = %config.generation.endpoint,
            persist = config.orchestrator.persist,
            include_history = config.orchestrator.include_history,
            "Application state initialized"
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            renderer: Arc::new(renderer),
            config: Arc::new(config),
        })
    }
}
