use serde::{Deserialize, Serialize};

/// A single cell value as produced by a parsing strategy.
///
/// Parsers only ever emit these three shapes; richer source types
/// (booleans, dates, formula errors) are flattened to text or a
/// serial number at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// An in-memory table: one header per column, row-major cell storage.
///
/// Invariant: every row holds exactly `headers.len()` cells. Parsers
/// reconcile ragged input before constructing a `Table`, so a `Table`
/// never carries rows of uneven width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == headers.len()));
        Self { headers, rows }
    }

    /// Number of data rows, excluding the header row.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}
