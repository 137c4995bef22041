// ============================================================
// CONVERT WORKBOOK USE CASE
// ============================================================
// Drive the strategy cascade, normalize, and re-serialize

use std::sync::Mutex;

use crate::application::use_cases::table_normalizer::TableNormalizer;
use crate::domain::conversion::{ConversionOutcome, RawInput};
use crate::domain::error::{ConvertError, StrategyFailure};
use crate::infrastructure::parsers::{default_cascade, ParseStrategy, ParseSuccess};
use crate::infrastructure::workbook_writer::WorkbookSerializer;
use crate::interfaces::http::{add_log, LogEntry};

/// The conversion pipeline: an ordered cascade of parsing strategies,
/// stopped at the first structural success, followed by normalization
/// and XLSX serialization.
///
/// This is a cascading fallback, not a quality comparison: no
/// strategy's output is ever scored against another's.
pub struct ConvertWorkbookUseCase {
    strategies: Vec<Box<dyn ParseStrategy>>,
    normalizer: TableNormalizer,
    serializer: WorkbookSerializer,
}

impl Default for ConvertWorkbookUseCase {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertWorkbookUseCase {
    pub fn new() -> Self {
        Self::with_strategies(default_cascade())
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ParseStrategy>>) -> Self {
        Self {
            strategies,
            normalizer: TableNormalizer,
            serializer: WorkbookSerializer,
        }
    }

    /// Run one conversion to completion. Per-strategy failures are
    /// swallowed and recorded in `logs`; only the aggregate failure or
    /// a serializer fault escapes.
    pub fn convert(
        &self,
        input: &RawInput,
        logs: &Mutex<Vec<LogEntry>>,
    ) -> Result<ConversionOutcome, ConvertError> {
        add_log(
            logs,
            "INFO",
            "Convert",
            &format!("converting {} ({} bytes)", input.filename, input.bytes.len()),
        );

        let mut attempts = Vec::new();
        let mut success: Option<ParseSuccess> = None;

        for strategy in &self.strategies {
            match strategy.attempt(&input.bytes) {
                Ok(parsed) => {
                    add_log(
                        logs,
                        "INFO",
                        "Convert",
                        &format!("strategy {} accepted the input", parsed.strategy_id),
                    );
                    success = Some(parsed);
                    break;
                }
                Err(e) => {
                    add_log(
                        logs,
                        "INFO",
                        "Convert",
                        &format!("strategy {} failed: {}", strategy.name(), e),
                    );
                    attempts.push(StrategyFailure {
                        strategy: strategy.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let Some(ParseSuccess { table, strategy_id }) = success else {
            add_log(
                logs,
                "ERROR",
                "Convert",
                &format!("all {} strategies failed for {}", attempts.len(), input.filename),
            );
            return Err(ConvertError::UnrecognizedFormat { attempts });
        };

        let table = self.normalizer.normalize(table);
        let rows = table.row_count();
        let cols = table.column_count();

        let bytes = self.serializer.serialize(&table)?;

        add_log(
            logs,
            "INFO",
            "Convert",
            &format!(
                "converted {}: {} rows x {} cols via {} ({} bytes out)",
                input.filename,
                rows,
                cols,
                strategy_id,
                bytes.len()
            ),
        );

        Ok(ConversionOutcome {
            bytes,
            strategy: strategy_id,
            rows,
            cols,
        })
    }
}
