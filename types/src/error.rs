//! Parse errors for the textual forms of fixed-size identifiers.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}
