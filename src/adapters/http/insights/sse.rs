//! Server-sent event rendering of the insight stream.
//!
//! ```text
//! : connected 2024-05-01T10:00:00+00:00
//!
//! : ping 1714557615
//!
//! event: Mental Health
//! data: {"title":"..."}
//! ```
//!
//! Failed generations are sent as `event: insight_failed` with the insight
//! name and the error in the data.

use axum::response::sse::Event;
use serde_json::json;

use crate::application::handlers::insights::StreamFrame;
use crate::domain::insights::InsightEventKind;

/// Event name used for failed generations.
pub const FAILED_EVENT: &str = "insight_failed";

/// Renders one stream frame as an SSE event.
pub fn frame_to_event(frame: StreamFrame) -> Event {
    match frame {
        StreamFrame::Connected(at) => Event::default().comment(format!("connected {}", at.to_rfc3339())),
        StreamFrame::Heartbeat(at) => Event::default().comment(format!("ping {}", at.as_unix_secs())),
        StreamFrame::Insight(event) => match event.kind {
            InsightEventKind::Ready => Event::default().event(&event.name).data(event.payload.to_string()),
            InsightEventKind::Failed => {
                let data = json!({ "name": event.name, "error": event.payload["error"] });
                Event::default().event(FAILED_EVENT).data(data.to_string())
            }
        },
    }
}
