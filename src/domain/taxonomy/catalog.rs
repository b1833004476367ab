//! Immutable taxonomy catalog: dimension → subdimension → facet → questions.
//!
//! Built once at startup from ordered question rows and shared read-only
//! (typically behind an `Arc`) by every request afterwards. Subdimensions
//! and facets keep the order in which they first appear in the source rows;
//! the selection walk relies on that order being stable.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{DomainError, ErrorCode, QuestionId};

use super::question::{Question, QuestionRow, GENERAL};
use super::ranks::DimensionRanks;

/// Errors raised while building the catalog. All are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("question text cannot be empty (row {row})")]
    EmptyText { row: usize },

    #[error("field '{field}' cannot be empty (row {row})")]
    EmptyField { row: usize, field: &'static str },

    #[error("question source contains no questions")]
    NoQuestions,

    #[error("failed to read question source: {0}")]
    Source(String),
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        let code = match err {
            CatalogError::EmptyText { .. } | CatalogError::EmptyField { .. } => {
                ErrorCode::EmptyField
            }
            CatalogError::NoQuestions | CatalogError::Source(_) => ErrorCode::InvalidFormat,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Leaf grouping of individual questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub name: String,
    pub questions: Vec<Question>,
}

/// Mid-level grouping of facets within a dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDimension {
    pub name: String,
    pub facets: Vec<Facet>,
}

impl SubDimension {
    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    /// Every facet question of this subdimension, facet by facet.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.facets.iter().flat_map(|f| f.questions.iter())
    }
}

/// Top-level taxonomy category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    /// Tie-break priority from the rank table; lower sorts first.
    pub rank: u32,
    /// Dimension-level questions (`sub_dimension == general`).
    pub dimension_questions: Vec<Question>,
    /// Subdimension-level questions (`facet == general`).
    pub general_questions: Vec<Question>,
    pub sub_dimensions: Vec<SubDimension>,
}

impl Dimension {
    fn new(name: String, rank: u32) -> Self {
        Self {
            name,
            rank,
            dimension_questions: Vec::new(),
            general_questions: Vec::new(),
            sub_dimensions: Vec::new(),
        }
    }

    pub fn sub_dimension(&self, name: &str) -> Option<&SubDimension> {
        self.sub_dimensions.iter().find(|s| s.name == name)
    }

    /// Every question under this dimension, at any level.
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.dimension_questions
            .iter()
            .chain(self.general_questions.iter())
            .chain(self.sub_dimensions.iter().flat_map(|s| s.questions()))
    }

    fn facet_mut(&mut self, sub_dimension: &str, facet: &str) -> &mut Facet {
        let sub_idx = match self.sub_dimensions.iter().position(|s| s.name == sub_dimension) {
            Some(idx) => idx,
            None => {
                self.sub_dimensions.push(SubDimension {
                    name: sub_dimension.to_string(),
                    facets: Vec::new(),
                });
                self.sub_dimensions.len() - 1
            }
        };
        let sub = &mut self.sub_dimensions[sub_idx];
        let facet_idx = match sub.facets.iter().position(|f| f.name == facet) {
            Some(idx) => idx,
            None => {
                sub.facets.push(Facet {
                    name: facet.to_string(),
                    questions: Vec::new(),
                });
                sub.facets.len() - 1
            }
        };
        &mut sub.facets[facet_idx]
    }
}

/// The question taxonomy. Read-only once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: BTreeMap<QuestionId, Question>,
    dimension_questions: Vec<Question>,
    dimensions: Vec<Dimension>,
    index: HashMap<String, usize>,
    ranks: DimensionRanks,
}

impl Catalog {
    /// Folds ordered rows into the taxonomy.
    ///
    /// Row `i` becomes question `i + 1`. Fails on the first row with empty
    /// text or an empty dimension name.
    pub fn build<I>(rows: I, ranks: DimensionRanks) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = QuestionRow>,
    {
        let mut catalog = Self {
            questions: BTreeMap::new(),
            dimension_questions: Vec::new(),
            dimensions: Vec::new(),
            index: HashMap::new(),
            ranks,
        };

        for (row_index, row) in rows.into_iter().enumerate() {
            if row.text.trim().is_empty() {
                return Err(CatalogError::EmptyText { row: row_index });
            }
            if row.dimension.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    row: row_index,
                    field: "dimension",
                });
            }

            let question = Question::from_row(QuestionId::from_row_index(row_index), row);
            catalog.insert(question);
        }

        if catalog.questions.is_empty() {
            return Err(CatalogError::NoQuestions);
        }

        info!(
            questions = catalog.questions.len(),
            dimensions = catalog.dimensions.len(),
            "Question catalog built"
        );

        Ok(catalog)
    }

    fn insert(&mut self, question: Question) {
        let dim_idx = match self.index.get(&question.dimension) {
            Some(idx) => *idx,
            None => {
                let rank = self.ranks.rank_of(&question.dimension);
                self.dimensions
                    .push(Dimension::new(question.dimension.clone(), rank));
                let idx = self.dimensions.len() - 1;
                self.index.insert(question.dimension.clone(), idx);
                idx
            }
        };
        let dimension = &mut self.dimensions[dim_idx];

        if question.sub_dimension == GENERAL {
            dimension.dimension_questions.push(question.clone());
            self.dimension_questions.push(question.clone());
        } else if question.facet == GENERAL {
            dimension.general_questions.push(question.clone());
        } else {
            dimension
                .facet_mut(&question.sub_dimension, &question.facet)
                .questions
                .push(question.clone());
        }

        self.questions.insert(question.id, question);
    }

    /// All questions keyed by id.
    pub fn questions(&self) -> &BTreeMap<QuestionId, Question> {
        &self.questions
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(&id)
    }

    /// Flat list of dimension-level questions across all dimensions, in id order.
    pub fn dimension_questions(&self) -> &[Question] {
        &self.dimension_questions
    }

    /// Dimensions in order of first appearance.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.index.get(name).map(|idx| &self.dimensions[*idx])
    }

    /// True if `name` is listed in the configured rank table.
    pub fn is_valid_dimension(&self, name: &str) -> bool {
        self.ranks.contains(name)
    }

    pub fn ranks(&self) -> &DimensionRanks {
        &self.ranks
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
