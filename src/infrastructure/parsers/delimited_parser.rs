// ============================================================
// DELIMITED TEXT PARSER
// ============================================================
// Decode bytes under an explicit encoding and split on a delimiter

use csv::ReaderBuilder;
use encoding_rs::Encoding;

use crate::domain::error::ParseError;
use crate::domain::table::{CellValue, Table};
use crate::infrastructure::encoding_sniffer::EncodingSniffer;
use crate::infrastructure::parsers::{ParseStrategy, ParseSuccess};

/// Parse delimited text into a `Table` given an explicit encoding and
/// delimiter. The first record is the header row; ragged data rows are
/// reconciled to the header width at parse time so every `Table` leaves
/// here with even rows.
pub struct DelimitedTextParser {
    delimiter: u8,
}

impl DelimitedTextParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn parse(&self, bytes: &[u8], encoding: &'static Encoding) -> Result<Table, ParseError> {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            return Err(ParseError::DecodeError(format!(
                "input is not valid {}",
                encoding.name()
            )));
        }
        self.parse_text(&text)
    }

    fn parse_text(&self, text: &str) -> Result<Table, ParseError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ParseError::DelimiterMismatch(format!("failed to read header row: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        // A single column means the delimiter guess was wrong, not that
        // the input is a valid one-column table.
        if headers.len() < 2 {
            return Err(ParseError::DelimiterMismatch(format!(
                "only {} column(s) under delimiter {}",
                headers.len(),
                delimiter_token(self.delimiter)
            )));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| {
                ParseError::DelimiterMismatch(format!("failed to parse record: {}", e))
            })?;
            let row: Vec<CellValue> = (0..headers.len())
                .map(|idx| infer_cell(record.get(idx).unwrap_or("")))
                .collect();
            rows.push(row);
        }

        Ok(Table::new(headers, rows))
    }
}

/// Empty fields stay blank, finite numerics become numbers, everything
/// else is kept as text.
fn infer_cell(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}

/// Printable token for a delimiter byte, used in strategy identifiers.
pub fn delimiter_token(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tab",
        b';' => ";",
        b'|' => "|",
        b',' => ",",
        _ => "?",
    }
}

fn encoding_label(encoding: &'static Encoding) -> String {
    encoding.name().to_ascii_lowercase()
}

/// Cascade entry: sniff the encoding statistically, then parse as
/// comma-separated text. The reported identifier carries the detected
/// encoding, e.g. `csv-euc-kr`.
pub struct SniffedDelimitedStrategy;

impl ParseStrategy for SniffedDelimitedStrategy {
    fn name(&self) -> &str {
        "csv-detected"
    }

    fn attempt(&self, bytes: &[u8]) -> Result<ParseSuccess, ParseError> {
        let encoding = EncodingSniffer::sniff(bytes);
        let table = DelimitedTextParser::new(b',').parse(bytes, encoding)?;
        Ok(ParseSuccess {
            table,
            strategy_id: format!("csv-{}", encoding_label(encoding)),
        })
    }
}

/// Cascade entry for one (encoding, delimiter) pair of the sweep,
/// e.g. `csv-euc-kr-;`.
pub struct DelimitedPairStrategy {
    encoding: &'static Encoding,
    delimiter: u8,
    id: String,
}

impl DelimitedPairStrategy {
    pub fn new(encoding: &'static Encoding, delimiter: u8) -> Self {
        let id = format!(
            "csv-{}-{}",
            encoding_label(encoding),
            delimiter_token(delimiter)
        );
        Self {
            encoding,
            delimiter,
            id,
        }
    }
}

impl ParseStrategy for DelimitedPairStrategy {
    fn name(&self) -> &str {
        &self.id
    }

    fn attempt(&self, bytes: &[u8]) -> Result<ParseSuccess, ParseError> {
        let table = DelimitedTextParser::new(self.delimiter).parse(bytes, self.encoding)?;
        Ok(ParseSuccess {
            table,
            strategy_id: self.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{EUC_KR, UTF_8, WINDOWS_1252};

    #[test]
    fn test_parse_simple_csv() {
        let table = DelimitedTextParser::new(b',')
            .parse(b"name,age,city\nalice,30,NYC\nbob,25,LA\n", UTF_8)
            .unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0][0], CellValue::Text("alice".to_string()));
        assert_eq!(table.rows[0][1], CellValue::Number(30.0));
    }

    #[test]
    fn test_ragged_rows_are_reconciled() {
        let table = DelimitedTextParser::new(b',')
            .parse(b"a,b,c\n1,2\n1,2,3,4\n", UTF_8)
            .unwrap();

        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], CellValue::Empty);
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.rows[1][2], CellValue::Number(3.0));
    }

    #[test]
    fn test_single_column_is_rejected() {
        let err = DelimitedTextParser::new(b';')
            .parse(b"a,b,c\n1,2,3\n", UTF_8)
            .unwrap_err();
        assert!(matches!(err, ParseError::DelimiterMismatch(_)));
    }

    #[test]
    fn test_wrong_encoding_is_a_decode_error() {
        let (encoded, _, _) = EUC_KR.encode("이름,나이\n홍길동,30\n");
        let err = DelimitedTextParser::new(b',')
            .parse(&encoded, UTF_8)
            .unwrap_err();
        assert!(matches!(err, ParseError::DecodeError(_)));
    }

    #[test]
    fn test_euc_kr_semicolon_parse() {
        let (encoded, _, _) = EUC_KR.encode("이름;나이\n홍길동;30\n");
        let table = DelimitedTextParser::new(b';').parse(&encoded, EUC_KR).unwrap();
        assert_eq!(table.headers, vec!["이름", "나이"]);
        assert_eq!(table.rows[0][0], CellValue::Text("홍길동".to_string()));
    }

    #[test]
    fn test_blank_fields_stay_empty() {
        let table = DelimitedTextParser::new(b',')
            .parse(b"a,b\n,x\n", UTF_8)
            .unwrap();
        assert_eq!(table.rows[0][0], CellValue::Empty);
    }

    #[test]
    fn test_pair_strategy_id() {
        let strategy = DelimitedPairStrategy::new(WINDOWS_1252, b';');
        assert_eq!(strategy.name(), "csv-windows-1252-;");
    }

    #[test]
    fn test_sniffed_strategy_reports_detected_encoding() {
        let success = SniffedDelimitedStrategy
            .attempt(b"name,age\nalice,30\n")
            .unwrap();
        assert_eq!(success.strategy_id, "csv-utf-8");
    }
}
