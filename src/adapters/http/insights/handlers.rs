//! HTTP handlers for insight endpoints.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::adapters::broker::InsightBroker;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::identity::CurrentUser;
use crate::application::handlers::insights::{
    insight_stream, GetInsightsHandler, GetInsightsQuery, InsightCoordinator,
};

use super::dto::{HolisticResponse, InsightsResponse};
use super::sse::frame_to_event;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Stream tuning.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Events buffered per subscription.
    pub buffer: usize,
    /// Keep-alive period.
    pub heartbeat: Duration,
    /// Cancelled at server shutdown so open streams end.
    pub shutdown: CancellationToken,
}

#[derive(Clone)]
pub struct InsightHandlers {
    get_handler: Arc<GetInsightsHandler>,
    coordinator: Arc<InsightCoordinator>,
    broker: InsightBroker,
    stream: StreamSettings,
}

impl InsightHandlers {
    pub fn new(
        get_handler: Arc<GetInsightsHandler>,
        coordinator: Arc<InsightCoordinator>,
        broker: InsightBroker,
        stream: StreamSettings,
    ) -> Self {
        Self {
            get_handler,
            coordinator,
            broker,
            stream,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /v1/insights - Finished insights
pub async fn get_insights(
    State(handlers): State<InsightHandlers>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<InsightsResponse>, ApiError> {
    let insights = handlers.get_handler.handle(GetInsightsQuery { user_id }).await?;
    Ok(Json(InsightsResponse { insights }))
}

/// POST /v1/insights/holistic - Generate the holistic insight now
pub async fn generate_holistic(
    State(handlers): State<InsightHandlers>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<HolisticResponse>, ApiError> {
    let insight = handlers.coordinator.generate_holistic(&user_id).await?;
    Ok(Json(HolisticResponse { insight }))
}

/// GET /v1/insights/stream - Live insight events
///
/// The subscription ends when the client disconnects (the response stream
/// is dropped) or the server shuts down.
pub async fn stream_insights(
    State(handlers): State<InsightHandlers>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let settings = &handlers.stream;
    let subscription = handlers
        .broker
        .subscribe(user_id, settings.buffer, &settings.shutdown)
        .await?;

    let frames = insight_stream(subscription, settings.heartbeat);
    Ok(Sse::new(frames.map(|frame| Ok(frame_to_event(frame)))))
}
