//! Configuration loader for chatrelay.
//!
//! Reads `chatrelay.toml` (or the file named on the command line) into
//! [`RelayConfig`], layers environment/CLI overrides on top, and validates the
//! result. A missing default file falls back to built-in defaults; a file the
//! user asked for explicitly must exist and parse.

use std::path::Path;

use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ConfigError;

/// Default config file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chatrelay.toml";

/// Values from the environment or command line that win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub generation_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Load configuration from `path`.
///
/// - If the file does not exist and `required` is false, returns
///   [`RelayConfig::default()`].
/// - If the file does not exist and `required` is true, fails.
/// - If the file exists but cannot be read or parsed, fails.
pub async fn load_config(path: &Path, required: bool) -> Result<RelayConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(RelayConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<RelayConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Apply overrides in place. Only `Some` values replace file values.
pub fn apply_overrides(config: &mut RelayConfig, overrides: ConfigOverrides) {
    if let Some(url) = overrides.database_url {
        config.database.url = Some(url);
    }
    if let Some(endpoint) = overrides.generation_url {
        config.generation.endpoint = endpoint;
    }
    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
}

/// Load, override and validate in one step.
pub async fn resolve_config(
    path: &Path,
    required: bool,
    overrides: ConfigOverrides,
) -> Result<RelayConfig, ConfigError> {
    let mut config = load_config(path, required).await?;
    apply_overrides(&mut config, overrides);
    config.validate()?;

    tracing::debug!(
        endpoint = %config.generation.endpoint,
        persist = config.orchestrator.persist,
        include_history = config.orchestrator.include_history,
        history_window = config.orchestrator.history_window,
        "Configuration resolved"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::config::HistorySource;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_optional_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(DEFAULT_CONFIG_FILE), false)
            .await
            .unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.database.url.is_none());
    }

    #[tokio::test]
    async fn load_config_missing_required_file_fails() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(&tmp.path().join("custom.toml"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn load_config_invalid_toml_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config(&path, false).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(
            &path,
            r#"
[database]
url = "sqlite://from-file.db?mode=rwc"

[orchestrator]
history_window = 3
history_source = "local"
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path, false).await.unwrap();
        assert_eq!(config.database.url.as_deref(), Some("sqlite://from-file.db?mode=rwc"));
        assert_eq!(config.orchestrator.history_window, 3);
        assert_eq!(config.orchestrator.history_source, HistorySource::Local);
    }

    #[test]
    fn overrides_replace_only_provided_values() {
        let mut config = RelayConfig::default();
        config.database.url = Some("sqlite://file.db".to_string());

        apply_overrides(
            &mut config,
            ConfigOverrides {
                port: Some(9000),
                generation_url: Some("http://gen:8000/generate-text".to_string()),
                ..ConfigOverrides::default()
            },
        );

        assert_eq!(config.database.url.as_deref(), Some("sqlite://file.db"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.generation.endpoint, "http://gen:8000/generate-text");
    }

    #[tokio::test]
    async fn resolve_config_without_database_url_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_config(
            &tmp.path().join(DEFAULT_CONFIG_FILE),
            false,
            ConfigOverrides::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("database.url")));
    }

    #[tokio::test]
    async fn resolve_config_with_override_url_succeeds() {
        let tmp = TempDir::new().unwrap();
        let config = resolve_config(
            &tmp.path().join(DEFAULT_CONFIG_FILE),
            false,
            ConfigOverrides {
                database_url: Some("sqlite://relay.db?mode=rwc".to_string()),
                ..ConfigOverrides::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(config.database.url.as_deref(), Some("sqlite://relay.db?mode=rwc"));
    }
}
