//! CSV question source.
//!
//! Reads rows in the fixed column order dimension, subDimension, facet,
//! text, minLabel, maxLabel. Columns are matched by position; a header row,
//! if present, is skipped and never used for matching. The label columns may
//! be omitted.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::taxonomy::{CatalogError, QuestionRow};
use crate::ports::QuestionSource;

/// Question source reading a CSV file from disk.
#[derive(Debug, Clone)]
pub struct CsvQuestionSource {
    path: PathBuf,
    has_header: bool,
}

impl CsvQuestionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            has_header: false,
        }
    }

    /// Treats the first line as a header row.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses rows from any reader.
    pub fn read_rows<R: Read>(reader: R, has_header: bool) -> Result<Vec<QuestionRow>, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (index, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| CatalogError::Source(format!("row {}: {}", index, e)))?;
            let row: QuestionRow = record
                .deserialize(None)
                .map_err(|e| CatalogError::Source(format!("row {}: {}", index, e)))?;
            rows.push(row);
        }
        Ok(rows)
    }
}

impl QuestionSource for CsvQuestionSource {
    fn load_rows(&self) -> Result<Vec<QuestionRow>, CatalogError> {
        let file = File::open(&self.path).map_err(|e| {
            CatalogError::Source(format!("{}: {}", self.path.display(), e))
        })?;
        let rows = Self::read_rows(file, self.has_header)?;
        info!(path = %self.path.display(), rows = rows.len(), "Loaded question rows");
        Ok(rows)
    }
}
