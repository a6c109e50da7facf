//! Application error type mapping to HTTP status codes.
//!
//! Turn failures are not routed through here: `POST /query` renders its own
//! fixed failure page. This covers the JSON endpoints and request parsing.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatrelay_types::error::RepositoryError;

#[derive(Debug)]
pub enum AppError {
    /// Turn store read failed.
    Repository(RepositoryError),
    /// Request body could not be parsed.
    Validation(String),
    /// Template rendering or other internal failure.
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<tera::Error> for AppError {
    fn from(e: tera::Error) -> Self {
        AppError::Internal(format!("template error: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Repository(e) => {
                tracing::error!(error = %e, "Turn store query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TURN_STORE_ERROR",
                    "Failed to load turn records".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_repository_error_maps_to_500() {
        let response =
            AppError::from(RepositoryError::Query("disk I/O error".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "TURN_STORE_ERROR");
        // Store internals stay in the logs.
        assert!(!body["error"].as_str().unwrap().contains("disk"));
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_400() {
        let response = AppError::Validation("bad body".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "bad body");
    }
}
