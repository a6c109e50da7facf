//! CLI command definitions for the `chatrelay` binary.
//!
//! Every connection setting can come from a flag or from the environment
//! (including a `.env` file loaded before parsing). Flags win over the
//! environment, and both win over `chatrelay.toml`.

pub mod history;

use std::path::PathBuf;

use chatrelay_observe::LogFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Relay prompts to a text-generation service and keep the conversation log.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./chatrelay.toml when present).
    #[arg(long, global = true, env = "CHATRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite URL of the turn store, e.g. sqlite://chatrelay.db?mode=rwc
    #[arg(long, global = true, env = "CHATRELAY_DATABASE_URL")]
    pub database_url: Option<String>,

    /// URL of the text-generation endpoint.
    #[arg(long, global = true, env = "CHATRELAY_GENERATION_URL")]
    pub generation_url: Option<String>,

    /// Bearer token sent to the generation endpoint.
    #[arg(long, global = true, env = "CHATRELAY_GENERATION_API_KEY", hide_env_values = true)]
    pub generation_api_key: Option<String>,

    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "CHATRELAY_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "CHATRELAY_OTEL")]
    pub otel: bool,

    /// Detailed output (-v for debug, -vv for trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Host to bind to.
        #[arg(long, env = "CHATRELAY_HOST")]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long, env = "CHATRELAY_PORT")]
        port: Option<u16>,
    },

    /// Show the most recent turns, oldest first.
    History {
        /// Number of turns to show.
        #[arg(short, long, default_value_t = chatrelay_types::turn::DEFAULT_HISTORY_WINDOW)]
        limit: usize,

        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Dump every stored turn record.
    #[command(alias = "ls")]
    List {
        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "chatrelay",
            "--database-url",
            "sqlite://relay.db",
            "serve",
            "--port",
            "9090",
        ])
        .unwrap();

        assert_eq!(cli.database_url.as_deref(), Some("sqlite://relay.db"));
        match cli.command {
            Commands::Serve { port, .. } => assert_eq!(port, Some(9090)),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_history_defaults() {
        let cli = Cli::try_parse_from(["chatrelay", "history", "--json", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::History { limit, json } => {
                assert_eq!(limit, 5);
                assert!(json);
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_parse_log_format() {
        let cli = Cli::try_parse_from(["chatrelay", "--log-format", "json", "list"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["chatrelay", "--log-format", "xml", "list"]).is_err());
    }
}
