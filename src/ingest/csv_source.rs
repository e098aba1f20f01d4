// src/ingest/csv_source.rs
use crate::error::Result;
use crate::ingest::types::{Transaction, TransactionSource};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Reads the transaction table from a headered CSV file.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    max_rows: Option<usize>,
}

impl CsvFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_rows: None,
        }
    }

    /// Stop after `n` data rows (the `GET_NROWS` setting).
    pub fn with_max_rows(mut self, n: Option<usize>) -> Self {
        self.max_rows = n;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionSource for CsvFileSource {
    fn load(&self) -> Result<Vec<Transaction>> {
        let file = std::fs::File::open(&self.path)?;
        let rows = read_transactions(file, self.max_rows)?;
        tracing::info!(
            target: "ingest",
            path = %self.path.display(),
            rows = rows.len(),
            "loaded transaction table"
        );
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "CsvFileSource"
    }
}

/// Parse transactions from any CSV reader. Cells are trimmed; empty cells
/// become `None`; unknown columns are ignored.
pub fn read_transactions<R: Read>(reader: R, max_rows: Option<usize>) -> Result<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let limit = max_rows.unwrap_or(usize::MAX);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize().take(limit) {
        let tx: Transaction = record?;
        rows.push(tx);
    }
    Ok(rows)
}
