//! chatrelay entry point.
//!
//! Binary name: `chatrelay`
//!
//! Loads `.env`, parses CLI arguments, resolves configuration, initializes the
//! turn store and generation client, then either serves HTTP or runs a
//! one-shot CLI command against the store.

mod cli;
mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::generate;
use secrecy::SecretString;

use chatrelay_infra::config::{ConfigOverrides, DEFAULT_CONFIG_FILE, resolve_config};
use chatrelay_observe::TracingOptions;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; clap reads the environment after this.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Shell completions don't need config or state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatrelay", &mut std::io::stdout());
        return Ok(());
    }

    chatrelay_observe::init_tracing(TracingOptions {
        format: cli.log_format,
        verbosity: cli.verbose,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    if let Err(ref e) = result {
        tracing::error!(error = %e, "chatrelay exited with an error");
    }

    chatrelay_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config_path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };

    let overrides = ConfigOverrides {
        database_url: cli.database_url.clone(),
        generation_url: cli.generation_url.clone(),
        host,
        port,
    };

    let config = resolve_config(&config_path, required, overrides).await?;
    let api_key = cli.generation_api_key.clone().map(SecretString::from);

    // Connect and migrate before anything binds.
    let state = AppState::init(config, api_key).await?;

    match cli.command {
        Commands::Serve { .. } => serve(state).await?,

        Commands::History { limit, json } => {
            cli::history::show_history(&state, limit, json).await?;
        }

        Commands::List { json } => {
            cli::history::list_turns(&state, json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "Server listening");
    println!(
        "  {} chatrelay listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that signal is ignored and the other one
/// still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
