//! Scoring module - averages of answer values per category.

mod averages;
mod cat_val;

pub use averages::{average, dimension_ratings, score_dimensions, score_facets};
pub use cat_val::{cat_vals_to_string, CatType, CatVal};
