//! Error types for decoding and report output.
//!
//! Rule violations are not errors. Everything here is fatal for the input
//! source it occurred in, since record boundaries can no longer be trusted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GedcomError {
    /// Line does not match `<level> [<xref>] <tag> [<value>]`.
    #[error("line {line}: cannot decode {text:?}")]
    Decode { line: usize, text: String },

    /// The first record line is not at level 0.
    #[error("line {line}: level {level} line has no enclosing record")]
    OrphanLine { line: usize, level: usize },

    /// Nesting level increased by more than one.
    #[error("line {line}: level jumps from {from} to {to}")]
    LevelJump { line: usize, from: usize, to: usize },

    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GedcomError>;
