//! Prompt submission extractor for `POST /query`.
//!
//! Accepts the `text` field from either a JSON object or a urlencoded form.
//! The raw value is kept as JSON so that a non-string `text` (a number, an
//! array) reaches prompt normalization and falls back like an empty one.
//! Any other content type is treated as a submission without `text`.

use axum::extract::{Form, FromRequest, Request};
use axum::http::HeaderMap;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::Json;
use serde_json::Value;

use crate::http::error::AppError;

/// A submitted prompt plus the response representation the client wants.
#[derive(Debug, Clone, Default)]
pub struct PromptSubmission {
    pub text: Option<Value>,
    /// `Accept: application/json` was sent.
    pub wants_json: bool,
}

impl<S> FromRequest<S> for PromptSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let wants_json = accepts_json(req.headers());

        let text = match content_type(req.headers()).as_deref() {
            Some("application/json") => {
                let Json(body) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                body.get("text").cloned()
            }
            Some("application/x-www-form-urlencoded") => {
                let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                form_text(fields)
            }
            _ => None,
        };

        Ok(Self { text, wants_json })
    }
}

/// The `text` form field. A repeated field becomes an array, which prompt
/// normalization treats like any other non-string value.
fn form_text(fields: Vec<(String, String)>) -> Option<Value> {
    let mut values: Vec<Value> = fields
        .into_iter()
        .filter(|(name, _)| name == "text")
        .map(|(_, value)| Value::String(value))
        .collect();

    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(Value::Array(values)),
    }
}

/// Media type of the body, lowercased, without parameters.
fn content_type(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = raw.split(';').next().unwrap_or(raw).trim();
    Some(essence.to_ascii_lowercase())
}

pub fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|media| {
            media
                .split(';')
                .next()
                .is_some_and(|m| m.trim().eq_ignore_ascii_case("application/json"))
        })
}
