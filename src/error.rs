//! Error type shared by every stage of the codec.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// The source file does not exist. Raised before anything is written.
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("invalid bit {0:?}: expected 0 or 1")]
    InvalidBit(String),

    /// Extraction from an empty heap.
    #[error("priority queue is empty")]
    EmptyQueue,

    #[error("malformed header token {token:?}: {reason}")]
    HeaderParse { token: String, reason: String },

    #[error("symbol {0:?} has no code in the table")]
    UnknownSymbol(char),

    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    #[error("separator {separator:?} cannot be used: {reason}")]
    InvalidSeparator { separator: String, reason: String },

    /// The plaintext contains the end-of-message marker.
    #[error("input contains a NUL character at offset {position}")]
    SentinelInInput { position: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub(crate) fn header(token: impl Into<String>, reason: impl Into<String>) -> Self {
        HuffmanError::HeaderParse {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
