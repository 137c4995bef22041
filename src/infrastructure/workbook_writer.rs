// ============================================================
// WORKBOOK SERIALIZER
// ============================================================
// Re-emit a normalized table as a canonical single-sheet XLSX document

use rust_xlsxwriter::{Color, DocProperties, ExcelDateTime, Format, Workbook};

use crate::domain::error::ConvertError;
use crate::domain::table::{CellValue, Table};

/// XLSX worksheet bounds.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Serialize a `Table` to XLSX bytes: single sheet, bold gray header
/// row, data rows unstyled, column and row order preserved exactly.
///
/// The document creation timestamp is pinned so identical tables always
/// serialize to bit-identical bytes.
pub struct WorkbookSerializer;

impl WorkbookSerializer {
    pub fn serialize(&self, table: &Table) -> Result<Vec<u8>, ConvertError> {
        if table.column_count() > MAX_COLS || table.row_count() + 1 > MAX_ROWS {
            return Err(ConvertError::Internal(format!(
                "table of {} x {} exceeds worksheet bounds",
                table.row_count(),
                table.column_count()
            )));
        }

        let mut workbook = Workbook::new();
        let created = ExcelDateTime::from_ymd(2000, 1, 1)
            .map_err(|e| ConvertError::Internal(e.to_string()))?;
        workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0xCCCCCC));

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name("Sheet1")
            .map_err(|e| ConvertError::Internal(e.to_string()))?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, header.as_str(), &header_format)
                .map_err(|e| ConvertError::Internal(e.to_string()))?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = col_idx as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(s) => {
                        worksheet
                            .write_string(row_num, col_num, s.as_str())
                            .map_err(|e| ConvertError::Internal(e.to_string()))?;
                    }
                    CellValue::Number(n) => {
                        worksheet
                            .write_number(row_num, col_num, *n)
                            .map_err(|e| ConvertError::Internal(e.to_string()))?;
                    }
                }
            }
        }

        workbook
            .save_to_buffer()
            .map_err(|e| ConvertError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(
            vec!["id".to_string(), "label".to_string()],
            vec![
                vec![CellValue::Number(1.0), CellValue::Text("one".to_string())],
                vec![CellValue::Number(2.0), CellValue::Text("two".to_string())],
            ],
        )
    }

    #[test]
    fn test_output_is_a_zip_package() {
        let bytes = WorkbookSerializer.serialize(&sample_table()).unwrap();
        assert_eq!(&bytes[..4], &[0x50, 0x4B, 0x03, 0x04]);
    }

    #[test]
    fn test_identical_tables_serialize_identically() {
        let a = WorkbookSerializer.serialize(&sample_table()).unwrap();
        let b = WorkbookSerializer.serialize(&sample_table()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_table_serializes() {
        let bytes = WorkbookSerializer
            .serialize(&Table::new(Vec::new(), Vec::new()))
            .unwrap();
        assert!(!bytes.is_empty());
    }
}
