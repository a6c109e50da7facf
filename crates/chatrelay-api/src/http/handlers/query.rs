//! POST /query - Submit a prompt and run one turn.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use chatrelay_core::turn::TurnError;
use chatrelay_types::error::GenerationError;

use crate::http::error::AppError;
use crate::http::extractors::prompt::PromptSubmission;
use crate::http::render::PageView;
use crate::state::AppState;

/// Run one turn and render the result.
///
/// Every turn failure produces the same 500 page (or JSON body when the
/// client accepts JSON); the cause is only logged.
pub async fn submit_query(
    State(state): State<AppState>,
    submission: PromptSubmission,
) -> Result<Response, AppError> {
    let (status, view) = match state.orchestrator.run_turn(submission.text.as_ref()).await {
        Ok(outcome) => (StatusCode::OK, PageView::from_outcome(outcome)),
        Err(e) => {
            log_turn_failure(&e);
            (StatusCode::INTERNAL_SERVER_ERROR, PageView::failure())
        }
    };

    if submission.wants_json {
        return Ok((status, Json(view)).into_response());
    }

    let html = state.renderer.render(&view)?;
    Ok((status, Html(html)).into_response())
}

fn log_turn_failure(error: &TurnError) {
    match error {
        TurnError::Generation(GenerationError::Status { status, body }) => {
            tracing::error!(status = *status, body = %body, "Generation call failed");
        }
        TurnError::Generation(GenerationError::MissingGeneratedText) => {
            tracing::error!("Generation response is missing 'generated_text'");
        }
        TurnError::Generation(e) => {
            tracing::error!(error = %e, "Generation call failed");
        }
        TurnError::Repository(e) => {
            tracing::error!(error = %e, "Turn store failed during turn");
        }
    }
}
