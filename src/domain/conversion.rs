/// The opaque upload handed to the pipeline by the transport layer.
#[derive(Debug, Clone)]
pub struct RawInput {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Result of a successful conversion, returned to the transport layer.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Canonical XLSX document bytes.
    pub bytes: Vec<u8>,
    /// Identifier of the parsing strategy that accepted the input.
    pub strategy: String,
    /// Data row count, excluding the header row.
    pub rows: usize,
    pub cols: usize,
}
