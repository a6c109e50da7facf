//! HttpGenerationClient -- concrete [`GenerationClient`] over plain HTTP.
//!
//! Posts `{prompt, history?, max_tokens?, temperature?}` as JSON to a single
//! configured endpoint and hands back the JSON body. One attempt, no
//! timeout: a hung upstream hangs the request that is waiting on it.
//!
//! The optional API key is wrapped in [`secrecy::SecretString`] and is only
//! exposed when building the `Authorization` header.

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::error;

use chatrelay_core::generation::GenerationClient;
use chatrelay_types::config::GenerationConfig;
use chatrelay_types::error::GenerationError;
use chatrelay_types::generation::GenerationRequest;

/// Generation client for a single HTTP endpoint.
///
/// Does not derive Debug so the API key cannot end up in logs.
pub struct HttpGenerationClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl HttpGenerationClient {
    /// Create a client for the configured endpoint.
    pub fn new(
        config: &GenerationConfig,
        api_key: Option<SecretString>,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

impl GenerationClient for HttpGenerationClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request);

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            error!(endpoint = %self.endpoint, error = %e, "Generation request failed");
            GenerationError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                body = %body,
                "Generation service returned an error status"
            );
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            error!(endpoint = %self.endpoint, error = %e, "Generation response was not JSON");
            GenerationError::Deserialization(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use chatrelay_types::turn::HistoryEntry;
    use serde_json::json;

    /// What the mock upstream saw: the Authorization header and the body.
    type Seen = Arc<Mutex<Option<(Option<String>, Value)>>>;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/generate-text")
    }

    fn client_for(endpoint: String, api_key: Option<&str>) -> HttpGenerationClient {
        let config = GenerationConfig {
            endpoint,
            ..GenerationConfig::default()
        };
        HttpGenerationClient::new(&config, api_key.map(|k| SecretString::from(k.to_string())))
            .unwrap()
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "hello".to_string(),
            history: Some(vec![HistoryEntry::user("hi"), HistoryEntry::assistant("hey")]),
            max_tokens: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_generate_returns_body_and_sends_payload() {
        let seen: Seen = Arc::new(Mutex::new(None));
        let router = Router::new()
            .route(
                "/generate-text",
                post(
                    |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        *seen.lock().unwrap() = Some((auth, body));
                        Json(json!({"generated_text": "X", "usage": {}}))
                    },
                ),
            )
            .with_state(seen.clone());
        let client = client_for(spawn_upstream(router).await, Some("secret-token"));

        let body = client.generate(&request()).await.unwrap();
        assert_eq!(body["generated_text"], "X");

        let (auth, sent) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer secret-token"));
        assert_eq!(sent["prompt"], "hello");
        assert_eq!(sent["history"][1], json!({"role": "assistant", "content": "hey"}));
        assert!(sent.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn test_generate_without_key_sends_no_authorization() {
        let seen: Seen = Arc::new(Mutex::new(None));
        let router = Router::new()
            .route(
                "/generate-text",
                post(
                    |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        *seen.lock().unwrap() = Some((auth, body));
                        Json(json!({}))
                    },
                ),
            )
            .with_state(seen.clone());
        let client = client_for(spawn_upstream(router).await, None);

        // A 200 with an empty object is still a transport-level success.
        let body = client.generate(&request()).await.unwrap();
        assert_eq!(body, json!({}));

        let (auth, _) = seen.lock().unwrap().clone().unwrap();
        assert!(auth.is_none());
    }

    #[tokio::test]
    async fn test_generate_maps_error_status() {
        let router = Router::new().route(
            "/generate-text",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let client = client_for(spawn_upstream(router).await, None);

        let err = client.generate(&request()).await.unwrap_err();
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_non_json_body() {
        let router = Router::new().route("/generate-text", post(|| async { "plain text" }));
        let client = client_for(spawn_upstream(router).await, None);

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_generate_unreachable_endpoint() {
        // Bind then drop a listener to get a port nobody is serving.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}/generate-text"), None);
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }
}
