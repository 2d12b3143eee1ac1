//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid selection '{0}'")]
    InvalidSelection(String),
    #[error("unsupported encoding '{0}'")]
    UnsupportedEncoding(String),
    #[error("row {row} is not valid {encoding}")]
    Decode { row: usize, encoding: String },
    #[error("cannot scan back to row {row} after reaching row {current}")]
    BackwardScan { row: usize, current: usize },
}
