//! Prompt construction for insight generation.

use serde::{Deserialize, Serialize};

use crate::domain::scoring::{cat_vals_to_string, CatVal};

/// Request handed to a text generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Standing instructions for the model; may be empty.
    pub instructions: String,
    /// Per-request input built from the user's scores.
    pub input: String,
}

impl Prompt {
    pub fn new(instructions: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            input: input.into(),
        }
    }

    /// Prompt for one completed dimension from its rendered facet ratings.
    pub fn dimension(instructions: impl Into<String>, dimension: &str, ratings: &str) -> Self {
        Self::new(
            instructions,
            format!(
                "Response in JSON, Focus on Dimension {}\nRatings:\n{}",
                dimension, ratings
            ),
        )
    }

    /// Prompt covering every scored dimension and facet.
    pub fn holistic(instructions: impl Into<String>, dimensions: &[CatVal], facets: &[CatVal]) -> Self {
        Self::new(
            instructions,
            format!(
                "Response in JSON\ndimension ratings:\n{}\nfacets:\n{}",
                cat_vals_to_string(dimensions),
                cat_vals_to_string(facets)
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_prompt_names_dimension_and_ratings() {
        let prompt = Prompt::dimension("be kind", "Mental Health", "Mood:\nCalm: 4\n");
        assert_eq!(prompt.instructions, "be kind");
        assert!(prompt.input.starts_with("Response in JSON, Focus on Dimension Mental Health\n"));
        assert!(prompt.input.ends_with("Calm: 4\n"));
    }

    #[test]
    fn holistic_prompt_lists_dimensions_then_facets() {
        let prompt = Prompt::holistic(
            "",
            &[CatVal::dimension("Spirituality", 1)],
            &[CatVal::facet("Mood.Calm", 3)],
        );
        assert_eq!(
            prompt.input,
            "Response in JSON\ndimension ratings:\nSpirituality: 1\n\nfacets:\nMood.Calm: 3\n"
        );
    }
}
