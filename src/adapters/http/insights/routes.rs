//! HTTP routes for insight endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{generate_holistic, get_insights, stream_insights, InsightHandlers};

/// Creates the insights router.
pub fn insight_routes(handlers: InsightHandlers) -> Router {
    Router::new()
        .route("/insights", get(get_insights))
        .route("/insights/holistic", post(generate_holistic))
        .route("/insights/stream", get(stream_insights))
        .with_state(handlers)
}
