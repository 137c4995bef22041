// ============================================================
// PARSING STRATEGIES
// ============================================================
// Uniform strategy interface plus the ordered default cascade

mod delimited_parser;
mod workbook_parser;

pub use delimited_parser::{DelimitedPairStrategy, DelimitedTextParser, SniffedDelimitedStrategy};
pub use workbook_parser::WorkbookParser;

use encoding_rs::{Encoding, EUC_KR, SHIFT_JIS, UTF_8, WINDOWS_1252};

use crate::domain::error::ParseError;
use crate::domain::table::Table;

/// Successful outcome of one strategy attempt.
#[derive(Debug)]
pub struct ParseSuccess {
    pub table: Table,
    /// Identifier reported to the caller, e.g. `xlsx` or `csv-euc-kr-;`.
    pub strategy_id: String,
}

/// One self-contained algorithm for turning raw bytes into a `Table`.
/// Strategies carry no state between attempts and never touch anything
/// outside the byte buffer they are given.
pub trait ParseStrategy: Send + Sync {
    /// Stable name used when reporting a swallowed failure.
    fn name(&self) -> &str;

    fn attempt(&self, bytes: &[u8]) -> Result<ParseSuccess, ParseError>;
}

/// Delimiter sweep order: most specific first, comma last because it is
/// already covered by the sniffed strategy ahead of the sweep.
const SWEEP_DELIMITERS: [u8; 4] = [b'\t', b';', b'|', b','];

/// Encoding sweep order. encoding_rs folds the cp949 superset into its
/// EUC-KR implementation, so the second regional slot is Shift_JIS.
const SWEEP_ENCODINGS: [&Encoding; 4] = [UTF_8, EUC_KR, SHIFT_JIS, WINDOWS_1252];

/// The fixed-priority strategy list:
///
/// 1. XLSX container
/// 2. legacy XLS container
/// 3. sniffed-encoding comma-separated text
/// 4. the delimiter/encoding sweep, delimiter outer, encoding inner,
///    flattened into one cascade entry per pair
pub fn default_cascade() -> Vec<Box<dyn ParseStrategy>> {
    let mut strategies: Vec<Box<dyn ParseStrategy>> = vec![
        Box::new(WorkbookParser::xlsx()),
        Box::new(WorkbookParser::xls()),
        Box::new(SniffedDelimitedStrategy),
    ];
    for &delimiter in &SWEEP_DELIMITERS {
        for &encoding in &SWEEP_ENCODINGS {
            strategies.push(Box::new(DelimitedPairStrategy::new(encoding, delimiter)));
        }
    }
    strategies
}
