use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure of a single parsing strategy. Always recovered by the
/// cascade falling through to the next strategy.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// The bytes do not carry this container variant's structural signature.
    UnsupportedContainer(String),
    /// The signature matched but the container content failed to parse.
    CorruptContainer(String),
    /// The bytes are not valid under the requested text encoding.
    DecodeError(String),
    /// The decoded text did not split into at least two columns.
    DelimiterMismatch(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnsupportedContainer(msg) => write!(f, "unsupported container: {}", msg),
            ParseError::CorruptContainer(msg) => write!(f, "corrupt container: {}", msg),
            ParseError::DecodeError(msg) => write!(f, "decode error: {}", msg),
            ParseError::DelimiterMismatch(msg) => write!(f, "delimiter mismatch: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// One swallowed strategy failure, kept for diagnostics on the
/// aggregate error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub strategy: String,
    pub reason: String,
}

/// Terminal pipeline failure surfaced to the caller.
#[derive(Debug)]
pub enum ConvertError {
    /// Every strategy in the cascade was exhausted. A client-input
    /// error, never a server fault.
    UnrecognizedFormat { attempts: Vec<StrategyFailure> },
    /// Checked by the transport layer before the pipeline is invoked.
    InputTooLarge { size: usize, limit: usize },
    /// Unexpected fault while serializing the output document.
    Internal(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::UnrecognizedFormat { attempts } => write!(
                f,
                "unrecognized or corrupt file format ({} strategies attempted)",
                attempts.len()
            ),
            ConvertError::InputTooLarge { size, limit } => {
                write!(f, "input of {} bytes exceeds the {} byte limit", size, limit)
            }
            ConvertError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {}
