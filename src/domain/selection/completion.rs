//! Detection of fully answered dimensions.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::answers::{ProgressView, UserAnswers};
use crate::domain::taxonomy::Catalog;

/// Reports dimensions whose every question has an answer on record.
///
/// Dimensions on the exclude list are never reported; they lack enough
/// questions to support an insight.
#[derive(Debug, Clone)]
pub struct CompletionDetector {
    catalog: Arc<Catalog>,
    excluded: BTreeSet<String>,
}

impl CompletionDetector {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            excluded: BTreeSet::new(),
        }
    }

    pub fn with_excluded<I, S>(mut self, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = excluded.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_excluded(&self, dimension: &str) -> bool {
        self.excluded.contains(dimension)
    }

    pub fn complete_dimensions(&self, answers: &UserAnswers) -> BTreeSet<String> {
        ProgressView::new(&self.catalog, answers)
            .complete_dimensions()
            .into_iter()
            .filter(|name| !self.is_excluded(name))
            .map(str::to_string)
            .collect()
    }
}
