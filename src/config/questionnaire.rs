//! Questionnaire configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::taxonomy::{DimensionRanks, DEFAULT_DIMENSION_ORDER, UNRANKED};

use super::error::ValidationError;

/// Question source and dimension ordering
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionnaireConfig {
    /// CSV file with one question per row
    #[serde(default = "default_questions_path")]
    pub questions_path: PathBuf,

    /// JSON file with the numbered daily paragraphs
    #[serde(default = "default_paragraphs_path")]
    pub paragraphs_path: PathBuf,

    /// Whether the CSV starts with a header row
    #[serde(default)]
    pub has_header: bool,

    /// Rank table, highest priority first (comma-separated)
    #[serde(default = "default_dimension_order")]
    pub dimension_order: String,

    /// Dimensions never reported complete (comma-separated)
    #[serde(default)]
    pub excluded_dimensions: String,

    /// Rank for dimensions missing from the table
    #[serde(default = "default_unranked_rank")]
    pub unranked_rank: u32,
}

impl QuestionnaireConfig {
    pub fn dimension_order_list(&self) -> Vec<String> {
        super::split_list(&self.dimension_order)
    }

    pub fn excluded_dimensions_list(&self) -> Vec<String> {
        super::split_list(&self.excluded_dimensions)
    }

    /// Rank table built from the configured order
    pub fn ranks(&self) -> DimensionRanks {
        DimensionRanks::from_order(self.dimension_order_list()).with_unranked(self.unranked_rank)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("QUESTIONNAIRE__QUESTIONS_PATH"));
        }
        if self.paragraphs_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("QUESTIONNAIRE__PARAGRAPHS_PATH"));
        }
        if self.dimension_order_list().is_empty() {
            return Err(ValidationError::EmptyDimensionOrder);
        }
        Ok(())
    }
}

impl Default for QuestionnaireConfig {
    fn default() -> Self {
        Self {
            questions_path: default_questions_path(),
            paragraphs_path: default_paragraphs_path(),
            has_header: false,
            dimension_order: default_dimension_order(),
            excluded_dimensions: String::new(),
            unranked_rank: default_unranked_rank(),
        }
    }
}

fn default_questions_path() -> PathBuf {
    PathBuf::from("data/questions.csv")
}

fn default_paragraphs_path() -> PathBuf {
    PathBuf::from("data/paragraphs.json")
}

fn default_dimension_order() -> String {
    DEFAULT_DIMENSION_ORDER.join(",")
}

fn default_unranked_rank() -> u32 {
    UNRANKED
}
