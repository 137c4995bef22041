// ============================================================
// STRUCTURED WORKBOOK PARSER
// ============================================================
// Interpret raw bytes as an XLSX or legacy XLS spreadsheet container

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};

use crate::domain::error::ParseError;
use crate::domain::table::{CellValue, Table};
use crate::infrastructure::parsers::{ParseStrategy, ParseSuccess};

/// ZIP local-file signature carried by every XLSX package.
const XLSX_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE/CFB signature carried by every legacy XLS document.
const XLS_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContainerVariant {
    Xlsx,
    Xls,
}

/// One container variant of the structured workbook parser. The first
/// worksheet's first row becomes the header row.
pub struct WorkbookParser {
    variant: ContainerVariant,
}

impl WorkbookParser {
    pub fn xlsx() -> Self {
        Self {
            variant: ContainerVariant::Xlsx,
        }
    }

    pub fn xls() -> Self {
        Self {
            variant: ContainerVariant::Xls,
        }
    }

    fn first_sheet_range(&self, bytes: &[u8]) -> Result<Range<Data>, ParseError> {
        match self.variant {
            ContainerVariant::Xlsx => {
                let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
                    .map_err(|e| ParseError::CorruptContainer(e.to_string()))?;
                workbook
                    .worksheet_range_at(0)
                    .ok_or_else(|| {
                        ParseError::CorruptContainer("workbook has no worksheets".to_string())
                    })?
                    .map_err(|e| ParseError::CorruptContainer(e.to_string()))
            }
            ContainerVariant::Xls => {
                let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))
                    .map_err(|e| ParseError::CorruptContainer(e.to_string()))?;
                workbook
                    .worksheet_range_at(0)
                    .ok_or_else(|| {
                        ParseError::CorruptContainer("workbook has no worksheets".to_string())
                    })?
                    .map_err(|e| ParseError::CorruptContainer(e.to_string()))
            }
        }
    }

    fn magic_matches(&self, bytes: &[u8]) -> bool {
        match self.variant {
            ContainerVariant::Xlsx => bytes.starts_with(&XLSX_MAGIC),
            ContainerVariant::Xls => bytes.starts_with(&XLS_MAGIC),
        }
    }
}

impl ParseStrategy for WorkbookParser {
    fn name(&self) -> &str {
        match self.variant {
            ContainerVariant::Xlsx => "xlsx",
            ContainerVariant::Xls => "xls",
        }
    }

    fn attempt(&self, bytes: &[u8]) -> Result<ParseSuccess, ParseError> {
        if !self.magic_matches(bytes) {
            return Err(ParseError::UnsupportedContainer(format!(
                "no {} signature",
                self.name()
            )));
        }
        let range = self.first_sheet_range(bytes)?;
        Ok(ParseSuccess {
            table: table_from_range(&range),
            strategy_id: self.name().to_string(),
        })
    }
}

fn table_from_range(range: &Range<Data>) -> Table {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(|cell| cell.to_string()).collect(),
        None => Vec::new(),
    };

    let rows: Vec<Vec<CellValue>> = rows_iter
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).map(cell_value).unwrap_or(CellValue::Empty))
                .collect()
        })
        .collect();

    Table::new(headers, rows)
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
