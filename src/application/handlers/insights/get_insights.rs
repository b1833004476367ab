//! GetInsightsHandler - Query handler for a user's finished insights.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::insights::HOLISTIC;
use crate::domain::taxonomy::Catalog;
use crate::ports::AnswerStore;

/// Query for every finished insight of a user.
#[derive(Debug, Clone)]
pub struct GetInsightsQuery {
    pub user_id: UserId,
}

/// Finished insight payloads keyed by insight name.
pub type GetInsightsResult = BTreeMap<String, Value>;

/// Handler for reading finished insights.
///
/// Only the holistic insight and insights named after catalog dimensions
/// are returned, and only once they are `DONE`.
pub struct GetInsightsHandler {
    catalog: Arc<Catalog>,
    store: Arc<dyn AnswerStore>,
}

impl GetInsightsHandler {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn AnswerStore>) -> Self {
        Self { catalog, store }
    }

    pub async fn handle(&self, query: GetInsightsQuery) -> Result<GetInsightsResult, DomainError> {
        let answers = self
            .store
            .get_user(&query.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(&query.user_id))?;

        let names = std::iter::once(HOLISTIC).chain(self.catalog.dimensions().iter().map(|d| d.name.as_str()));

        let insights = names
            .filter_map(|name| {
                if !answers.has_insight(name) {
                    return None;
                }
                let payload = answers.insight(name)?.payload.clone()?;
                Some((name.to_string(), payload))
            })
            .collect();

        Ok(insights)
    }
}
