//! Scored category values produced by averaging answers.

use serde::Serialize;
use std::fmt;

/// Kind of category a score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatType {
    Dimension,
    Facet,
}

impl fmt::Display for CatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatType::Dimension => write!(f, "Dimension"),
            CatType::Facet => write!(f, "Facet"),
        }
    }
}

/// A category name with its truncated integer average. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatVal {
    pub cat_type: CatType,
    pub name: String,
    pub value: i32,
}

impl CatVal {
    pub fn new(cat_type: CatType, name: impl Into<String>, value: i32) -> Self {
        Self {
            cat_type,
            name: name.into(),
            value,
        }
    }

    pub fn dimension(name: impl Into<String>, value: i32) -> Self {
        Self::new(CatType::Dimension, name, value)
    }

    pub fn facet(name: impl Into<String>, value: i32) -> Self {
        Self::new(CatType::Facet, name, value)
    }
}

impl fmt::Display for CatVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Renders one `name: value` line per entry.
pub fn cat_vals_to_string(values: &[CatVal]) -> String {
    values.iter().map(|cv| format!("{}\n", cv)).collect()
}
