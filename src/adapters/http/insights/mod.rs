//! HTTP adapter for insight endpoints, including the SSE stream.

mod dto;
mod handlers;
mod routes;
mod sse;

pub use dto::{HolisticResponse, InsightsResponse};
pub use handlers::{InsightHandlers, StreamSettings};
pub use routes::insight_routes;
pub use sse::{frame_to_event, FAILED_EVENT};
