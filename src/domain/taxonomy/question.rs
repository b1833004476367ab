//! Question value object and the raw source row it is built from.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::QuestionId;

/// Marker used in the subdimension or facet column for coarse questions.
///
/// `sub_dimension == GENERAL` marks a dimension-level question,
/// `facet == GENERAL` marks a subdimension-level question.
pub const GENERAL: &str = "general";

/// Granularity of a question within the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionLevel {
    Dimension,
    SubDimension,
    Facet,
}

/// A scaled question shown to the respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub min_label: String,
    pub max_label: String,
    pub dimension: String,
    pub sub_dimension: String,
    pub facet: String,
}

impl Question {
    /// Builds a question from a source row and the id assigned to it.
    pub fn from_row(id: QuestionId, row: QuestionRow) -> Self {
        Self {
            id,
            text: row.text,
            min_label: row.min_label,
            max_label: row.max_label,
            dimension: row.dimension,
            sub_dimension: row.sub_dimension,
            facet: row.facet,
        }
    }

    /// Where this question sits in the taxonomy.
    pub fn level(&self) -> QuestionLevel {
        if self.sub_dimension == GENERAL {
            QuestionLevel::Dimension
        } else if self.facet == GENERAL {
            QuestionLevel::SubDimension
        } else {
            QuestionLevel::Facet
        }
    }

    pub fn is_dimension_level(&self) -> bool {
        self.level() == QuestionLevel::Dimension
    }

    /// Facet score key, `"<subDimension>.<facet>"`.
    pub fn facet_key(&self) -> String {
        format!("{}.{}", self.sub_dimension, self.facet)
    }
}

/// One row of tabular question data.
///
/// Column order is fixed: dimension, subDimension, facet, text, minLabel, maxLabel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionRow {
    pub dimension: String,
    pub sub_dimension: String,
    pub facet: String,
    pub text: String,
    #[serde(default)]
    pub min_label: String,
    #[serde(default)]
    pub max_label: String,
}

impl QuestionRow {
    /// Convenience constructor used by tests and in-code fixtures.
    pub fn new(
        dimension: impl Into<String>,
        sub_dimension: impl Into<String>,
        facet: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            dimension: dimension.into(),
            sub_dimension: sub_dimension.into(),
            facet: facet.into(),
            text: text.into(),
            min_label: "Not at all".to_string(),
            max_label: "Completely".to_string(),
        }
    }

    /// Sets the scale labels.
    pub fn with_labels(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min_label = min.into();
        self.max_label = max.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(sub: &str, facet: &str) -> Question {
        Question::from_row(QuestionId::new(1), QuestionRow::new("Body", sub, facet, "How?"))
    }

    #[test]
    fn general_sub_dimension_is_dimension_level() {
        assert_eq!(question(GENERAL, GENERAL).level(), QuestionLevel::Dimension);
        assert_eq!(question(GENERAL, "Rest").level(), QuestionLevel::Dimension);
    }

    #[test]
    fn general_facet_is_sub_dimension_level() {
        assert_eq!(question("Sleep", GENERAL).level(), QuestionLevel::SubDimension);
    }

    #[test]
    fn named_facet_is_facet_level() {
        let q = question("Sleep", "Quality");
        assert_eq!(q.level(), QuestionLevel::Facet);
        assert_eq!(q.facet_key(), "Sleep.Quality");
    }

    #[test]
    fn question_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(question("Sleep", "Quality")).unwrap();
        assert_eq!(json["subDimension"], "Sleep");
        assert_eq!(json["minLabel"], "Not at all");
        assert_eq!(json["id"], 1);
    }
}
