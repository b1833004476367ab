//! Insight handlers.
//!
//! - `coordinator` - Generation jobs for completed dimensions and holistic insights
//! - `get_insights` - Finished insight payloads
//! - `stream` - Subscription delivery loop with heartbeats

mod coordinator;
mod get_insights;
mod stream;

pub use coordinator::{InsightCoordinator, InsightCoordinatorConfig};
pub use get_insights::{GetInsightsHandler, GetInsightsQuery, GetInsightsResult};
pub use stream::{insight_stream, StreamFrame, DEFAULT_HEARTBEAT};
