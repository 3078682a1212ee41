//! # Outbound Ports (Driven Ports)
//!
//! The write interface the indexer requires from the ledger. The indexer
//! only ever proposes inserts; it never reads, updates, or deletes.

use async_trait::async_trait;
use shared_types::LedgerRecord;
use thiserror::Error;

/// Result of proposing a record to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// The record was stored.
    Inserted,
    /// A record with this transaction identity already exists.
    AlreadyPresent,
}

/// Ledger write failure, e.g. the store being unreachable.
///
/// Duplicates are not failures; they come back as
/// [`SinkOutcome::AlreadyPresent`].
#[derive(Debug, Clone, Error)]
#[error("Ledger sink error: {message}")]
pub struct SinkError {
    /// Backend-reported cause.
    pub message: String,
}

/// Abstract write interface to the ledger store.
#[async_trait]
pub trait LedgerSink: Send + Sync {
    /// Store `record` unless its transaction identity is already present.
    async fn insert_if_absent(&self, record: LedgerRecord) -> Result<SinkOutcome, SinkError>;
}
