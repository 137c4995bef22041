pub mod convert_workbook;
pub mod table_normalizer;
