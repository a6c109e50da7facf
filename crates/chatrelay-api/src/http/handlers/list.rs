//! GET /list - Every stored turn record as JSON.

use axum::Json;
use axum::extract::State;

use chatrelay_types::turn::TurnRecord;

use crate::http::error::AppError;
use crate::state::AppState;

pub async fn list_turns(State(state): State<AppState>) -> Result<Json<Vec<TurnRecord>>, AppError> {
    let turns = state.orchestrator.list_turns().await?;
    Ok(Json(turns))
}
