//! Error types for the task codec and store
//!
//! Decoding failures are per-line and never abort a load; I/O failures are
//! reported to the caller with the path involved.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single serialized line could not be turned into a task
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Field count does not match the record shape selected by the tag
    #[error("{kind} record needs {expected} fields, found {found}")]
    FieldCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// Id field is not a positive integer
    #[error("invalid task id: {0:?}")]
    InvalidId(String),

    /// Priority field is not an integer
    #[error("invalid priority: {0:?}")]
    InvalidPriority(String),

    /// Line bytes are not UTF-8
    #[error("line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Errors surfaced by the task store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the task file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every id up to `u32::MAX` has been handed out
    #[error("no task ids left: id {} is already in use", u32::MAX)]
    IdsExhausted,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
