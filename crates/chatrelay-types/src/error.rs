use thiserror::Error;

/// Errors from repository operations (used by trait definitions in chatrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),
}

/// Errors from a call to the remote generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Transport(String),

    #[error("generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid generation response: {0}")]
    Deserialization(String),

    #[error("invalid generation response: missing 'generated_text'")]
    MissingGeneratedText,
}

/// Errors raised while loading or validating configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "generation service returned HTTP 502: bad gateway"
        );
        assert!(GenerationError::MissingGeneratedText
            .to_string()
            .contains("generated_text"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Missing("database.url");
        assert_eq!(err.to_string(), "missing required configuration: database.url");
    }
}
