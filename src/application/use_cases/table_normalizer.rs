// ============================================================
// TABLE NORMALIZER
// ============================================================
// Fill blank cells, derive missing headers, compute shape

use crate::domain::table::{CellValue, Table};

/// Normalize a parsed table before serialization: every blank cell
/// becomes an explicit empty string and every blank header name gets a
/// derived `column_{n}` name. Idempotent.
pub struct TableNormalizer;

impl TableNormalizer {
    pub fn normalize(&self, table: Table) -> Table {
        let headers = table
            .headers
            .into_iter()
            .enumerate()
            .map(|(idx, header)| {
                if header.trim().is_empty() {
                    format!("column_{}", idx + 1)
                } else {
                    header
                }
            })
            .collect();

        let rows = table
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        CellValue::Empty => CellValue::Text(String::new()),
                        other => other,
                    })
                    .collect()
            })
            .collect();

        Table::new(headers, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table() -> Table {
        Table::new(
            vec!["name".to_string(), String::new()],
            vec![
                vec![CellValue::Text("alice".to_string()), CellValue::Empty],
                vec![CellValue::Empty, CellValue::Number(7.0)],
            ],
        )
    }

    #[test]
    fn test_blank_cells_become_empty_strings() {
        let table = TableNormalizer.normalize(raw_table());
        assert_eq!(table.rows[0][1], CellValue::Text(String::new()));
        assert_eq!(table.rows[1][0], CellValue::Text(String::new()));
        assert_eq!(table.rows[1][1], CellValue::Number(7.0));
    }

    #[test]
    fn test_blank_headers_are_derived() {
        let table = TableNormalizer.normalize(raw_table());
        assert_eq!(table.headers, vec!["name", "column_2"]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = TableNormalizer.normalize(raw_table());
        let twice = TableNormalizer.normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_shape_is_preserved() {
        let table = TableNormalizer.normalize(raw_table());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
    }
}
