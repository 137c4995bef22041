pub mod config;
pub mod encoding_sniffer;
pub mod parsers;
pub mod workbook_writer;
