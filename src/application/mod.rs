pub mod use_cases;

pub use use_cases::convert_workbook::ConvertWorkbookUseCase;
pub use use_cases::table_normalizer::TableNormalizer;
