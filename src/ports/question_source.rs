//! Question source port.
//!
//! Supplies the ordered rows the catalog is built from. Row order matters:
//! it fixes question ids and the order of subdimensions and facets.

use crate::domain::taxonomy::{CatalogError, QuestionRow};

/// Port for loading raw question rows.
///
/// Loading happens once at startup, so the contract is synchronous.
pub trait QuestionSource: Send + Sync {
    /// Reads every row in source order.
    ///
    /// # Errors
    ///
    /// - `Source` when the data cannot be read or a row is malformed
    fn load_rows(&self) -> Result<Vec<QuestionRow>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_source_is_object_safe() {
        fn _accepts_dyn(_source: &dyn QuestionSource) {}
    }
}
