//! Adaptive selection of the next batch of questions.
//!
//! The walk is:
//!
//! 1. While any dimension-level question is unanswered, only those are
//!    offered (gating).
//! 2. Dimensions are ordered worst-scoring first, ties broken by rank.
//! 3. Within a dimension, unanswered subdimension-level questions come first.
//! 4. Then the first subdimension with an unanswered facet question is
//!    offered whole.
//!
//! Subdimensions are visited in the order they first appear in the source
//! rows, so the result is deterministic for a given catalog.

use std::sync::Arc;

use tracing::debug;

use crate::domain::answers::{ProgressView, UserAnswers};
use crate::domain::scoring::score_dimensions;
use crate::domain::taxonomy::{Catalog, Dimension, Question};

use super::policy::{SelectionError, SelectionPolicy};

/// Chooses which questions to present next. Stateless apart from the catalog.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    catalog: Arc<Catalog>,
}

impl SelectionEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the next whole batch under `policy`.
    ///
    /// An empty batch means every question has been answered.
    pub fn next_questions(
        &self,
        answers: &UserAnswers,
        policy: &SelectionPolicy,
    ) -> Result<Vec<Question>, SelectionError> {
        self.validate(policy)?;
        let progress = ProgressView::new(&self.catalog, answers);

        let gate = progress.unanswered_dimension_questions();
        if !gate.is_empty() {
            return Ok(gate.into_iter().cloned().collect());
        }

        for dimension in self.walk_order(answers, policy) {
            if let Some(batch) = Self::batch_for(&progress, dimension) {
                return Ok(batch);
            }
            debug!(dimension = %dimension.name, "Dimension fully answered");
        }

        debug!(user_id = %answers.user_id, "Questionnaire complete");
        Ok(Vec::new())
    }

    /// Returns at most `cap` unanswered questions in walk order.
    ///
    /// Unlike [`next_questions`](Self::next_questions) this never returns
    /// answered questions and does not stop at batch boundaries; it stops as
    /// soon as `cap` questions have been collected. Gating still applies.
    pub fn next_window(
        &self,
        answers: &UserAnswers,
        policy: &SelectionPolicy,
        cap: usize,
    ) -> Result<Vec<Question>, SelectionError> {
        self.validate(policy)?;
        if cap == 0 {
            return Ok(Vec::new());
        }
        let progress = ProgressView::new(&self.catalog, answers);

        let gate = progress.unanswered_dimension_questions();
        if !gate.is_empty() {
            return Ok(gate.into_iter().take(cap).cloned().collect());
        }

        let mut window: Vec<Question> = Vec::with_capacity(cap);
        for dimension in self.walk_order(answers, policy) {
            let pending = dimension
                .general_questions
                .iter()
                .chain(dimension.sub_dimensions.iter().flat_map(|s| s.questions()))
                .filter(|q| !progress.is_answered(q));

            for question in pending {
                window.push(question.clone());
                if window.len() == cap {
                    return Ok(window);
                }
            }
        }

        if window.is_empty() {
            debug!(user_id = %answers.user_id, "Questionnaire complete");
        }
        Ok(window)
    }

    fn validate(&self, policy: &SelectionPolicy) -> Result<(), SelectionError> {
        match policy.priority_dimension() {
            Some(name) if !self.catalog.is_valid_dimension(name) => {
                Err(SelectionError::InvalidDimension(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Dimensions in the order the walk visits them.
    ///
    /// Scored dimensions come first, worst first. Dimensions without any
    /// valued dimension-level answer follow in rank order.
    fn walk_order(&self, answers: &UserAnswers, policy: &SelectionPolicy) -> Vec<&Dimension> {
        let catalog = &*self.catalog;
        let scored = score_dimensions(catalog.dimension_questions(), answers, catalog.ranks());

        let mut order: Vec<&Dimension> = scored
            .iter()
            .filter_map(|cv| catalog.dimension(&cv.name))
            .collect();

        let mut unscored: Vec<&Dimension> = catalog
            .dimensions()
            .iter()
            .filter(|d| !scored.iter().any(|cv| cv.name == d.name))
            .collect();
        unscored.sort_by_key(|d| d.rank);
        order.extend(unscored);

        if let Some(pinned) = policy.priority_dimension() {
            if let Some(pos) = order.iter().position(|d| d.name == pinned) {
                let dimension = order.remove(pos);
                order.insert(0, dimension);
            }
        }
        order
    }

    /// The batch a dimension contributes, or `None` once it is fully answered.
    fn batch_for(progress: &ProgressView<'_>, dimension: &Dimension) -> Option<Vec<Question>> {
        let general = progress.unanswered(&dimension.general_questions);
        if !general.is_empty() {
            return Some(general.into_iter().cloned().collect());
        }

        dimension
            .sub_dimensions
            .iter()
            .find(|sub| sub.questions().any(|q| !progress.is_answered(q)))
            .map(|sub| sub.questions().cloned().collect())
    }
}
