//! Ledger store error types.

use thiserror::Error;

/// Errors from ledger store operations.
///
/// A duplicate insert and an empty query result are well-defined answers,
/// not errors, and have no variant here.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The storage backend failed.
    #[error("Ledger storage error: {message}")]
    Storage { message: String },

    /// A stored record could not be decoded.
    #[error("Ledger codec error: {message}")]
    Codec { message: String },
}

impl LedgerError {
    /// Wraps a backend failure.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }

    /// Wraps a record codec failure.
    pub fn codec(err: impl std::fmt::Display) -> Self {
        Self::Codec {
            message: err.to_string(),
        }
    }
}
