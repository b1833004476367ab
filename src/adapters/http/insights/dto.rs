//! HTTP DTOs for insight endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::application::handlers::insights::GetInsightsResult;

/// Every finished insight, keyed by name.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsResponse {
    pub insights: GetInsightsResult,
}

/// Freshly generated holistic insight.
#[derive(Debug, Clone, Serialize)]
pub struct HolisticResponse {
    pub insight: Value,
}
