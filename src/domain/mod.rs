pub mod conversion;
pub mod error;
pub mod table;
