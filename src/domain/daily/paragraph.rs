//! Paragraph catalog for the daily reading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

/// One numbered reading paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: ParagraphText,
    #[serde(default)]
    pub links: ParagraphLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphText {
    pub title: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub long: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphLinks {
    #[serde(default)]
    pub inspirational: String,
}

/// Errors from building a paragraph catalog.
#[derive(Debug, Error)]
pub enum ParagraphError {
    #[error("invalid paragraph JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("paragraph ids start at 1, found {0}")]
    InvalidId(u32),

    #[error("paragraph {0} has an empty title")]
    EmptyTitle(u32),
}

/// Immutable paragraphs keyed by id, numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct ParagraphCatalog {
    paragraphs: BTreeMap<u32, Paragraph>,
}

impl ParagraphCatalog {
    /// Parses a JSON object of `"<id>": paragraph` entries.
    pub fn from_json(raw: &str) -> Result<Self, ParagraphError> {
        let paragraphs: BTreeMap<u32, Paragraph> = serde_json::from_str(raw)?;
        for (id, paragraph) in &paragraphs {
            if *id == 0 {
                return Err(ParagraphError::InvalidId(*id));
            }
            if paragraph.text.title.trim().is_empty() {
                return Err(ParagraphError::EmptyTitle(*id));
            }
        }

        info!(paragraphs = paragraphs.len(), "Paragraph catalog built");
        Ok(Self { paragraphs })
    }

    pub fn get(&self, id: u32) -> Option<&Paragraph> {
        self.paragraphs.get(&id)
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}
