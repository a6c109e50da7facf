//! GET / - Landing page with the recent conversation.

use axum::extract::State;
use axum::response::Html;

use crate::http::error::AppError;
use crate::http::render::PageView;
use crate::state::AppState;

/// Render the page with the newest history window, oldest first.
///
/// A store failure still renders the page, with empty history.
pub async fn landing_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let history = match state.orchestrator.display_history().await {
        Ok(history) => history,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load history for landing page");
            Vec::new()
        }
    };

    let html = state.renderer.render(&PageView::landing(history))?;
    Ok(Html(html))
}
