//! HTTP adapters - REST API and event stream.
//!
//! Each area has its own module with DTOs, handlers and routes. Identity
//! comes from the `x-user-id` header.

pub mod error;
pub mod identity;
pub mod insights;
pub mod questionnaire;

pub use error::{ApiError, ErrorResponse};
pub use identity::{CurrentUser, USER_ID_HEADER};
pub use insights::{insight_routes, InsightHandlers, StreamSettings};
pub use questionnaire::{questionnaire_routes, QuestionnaireHandlers};

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Builds the full application router under `/v1`.
///
/// `request_timeout` bounds the time to a response head, so open event
/// streams are not cut off by it.
pub fn app_router(
    questionnaire: QuestionnaireHandlers,
    insights: InsightHandlers,
    cors_origins: &[String],
    request_timeout: Duration,
) -> Router {
    let api = Router::new()
        .merge(questionnaire_routes(questionnaire))
        .merge(insight_routes(insights));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/v1", api)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins; any origin when none are configured.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed).allow_credentials(true)
    }
}
