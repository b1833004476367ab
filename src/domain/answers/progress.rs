//! Read-only view combining a user's answers with the catalog.

use crate::domain::taxonomy::{Catalog, Dimension, Question};

use super::answer::UserAnswers;

/// Derives unanswered questions and completed dimensions.
///
/// Borrows both inputs; nothing is cached beyond the lifetime of a request.
#[derive(Debug, Clone, Copy)]
pub struct ProgressView<'a> {
    catalog: &'a Catalog,
    answers: &'a UserAnswers,
}

impl<'a> ProgressView<'a> {
    pub fn new(catalog: &'a Catalog, answers: &'a UserAnswers) -> Self {
        Self { catalog, answers }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn answers(&self) -> &'a UserAnswers {
        self.answers
    }

    pub fn is_answered(&self, question: &Question) -> bool {
        self.answers.is_answered(question.id)
    }

    /// Filters `questions` down to the unanswered ones, preserving order.
    pub fn unanswered<'q, I>(&self, questions: I) -> Vec<&'q Question>
    where
        I: IntoIterator<Item = &'q Question>,
    {
        questions
            .into_iter()
            .filter(|q| !self.is_answered(q))
            .collect()
    }

    /// Unanswered dimension-level questions across the whole catalog.
    pub fn unanswered_dimension_questions(&self) -> Vec<&'a Question> {
        self.unanswered(self.catalog.dimension_questions())
    }

    /// True once every question under `dimension` has an answer on record.
    pub fn is_dimension_complete(&self, dimension: &Dimension) -> bool {
        dimension.all_questions().all(|q| self.is_answered(q))
    }

    /// Names of fully answered dimensions, in catalog order.
    pub fn complete_dimensions(&self) -> Vec<&'a str> {
        self.catalog
            .dimensions()
            .iter()
            .filter(|d| self.is_dimension_complete(d))
            .map(|d| d.name.as_str())
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.catalog
            .questions()
            .keys()
            .filter(|id| self.answers.is_answered(**id))
            .count()
    }
}
