//! Taxonomy module - the question catalog.
//!
//! - `question` - Question value object and raw source rows
//! - `ranks` - Configured dimension rank table
//! - `catalog` - Immutable dimension → subdimension → facet tree

mod catalog;
mod question;
mod ranks;

pub use catalog::{Catalog, CatalogError, Dimension, Facet, SubDimension};
pub use question::{Question, QuestionLevel, QuestionRow, GENERAL};
pub use ranks::{DimensionRanks, DEFAULT_DIMENSION_ORDER, UNRANKED};
