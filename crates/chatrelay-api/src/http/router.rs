//! Axum router configuration with middleware.
//!
//! Routes: `/` (page), `/query` (prompt submission), `/list` (turn records),
//! `/health`. Middleware: permissive CORS and per-request tracing.
//!
//! Files under the configured static directory are served for any other path
//! when that directory exists.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.web.static_dir.clone();

    let mut router = Router::new()
        .route("/", get(handlers::page::landing_page))
        .route("/query", post(handlers::query::submit_query))
        .route("/list", get(handlers::list::list_turns))
        .route("/health", get(health_check));

    // Before the layers, so static files get CORS headers and request spans too.
    if std::path::Path::new(&static_dir).is_dir() {
        router = router.fallback_service(ServeDir::new(&static_dir));
        tracing::info!(path = %static_dir, "Static file serving enabled");
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
