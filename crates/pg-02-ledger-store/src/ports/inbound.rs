//! # Inbound Ports (Driving Ports)
//!
//! The ledger API offered to the rest of the gateway.

use crate::domain::LedgerError;
use async_trait::async_trait;
use shared_types::{LedgerRecord, PaymentSummary};

/// Result of an idempotent insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was stored; this caller won the race.
    Inserted,
    /// A record with the same transaction identity already exists; the call
    /// was a successful no-op.
    AlreadyPresent,
}

impl InsertOutcome {
    /// True when this call stored the record.
    #[must_use]
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Abstract interface for the ledger store.
///
/// Callable concurrently: calls racing on the same transaction identity
/// serialize inside the implementation, calls for different identities may
/// proceed fully in parallel.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Insert `record` unless one with the same `tx_identity` exists.
    ///
    /// At most one concurrent caller observes [`InsertOutcome::Inserted`] for
    /// a given identity; all others observe `AlreadyPresent`.
    async fn insert_if_absent(&self, record: LedgerRecord)
        -> Result<InsertOutcome, LedgerError>;

    /// Up to `limit` records for `slug`, newest-first by insertion recency.
    ///
    /// An unknown slug yields an empty list.
    async fn list_by_slug(
        &self,
        slug: &str,
        limit: usize,
    ) -> Result<Vec<LedgerRecord>, LedgerError>;

    /// Aggregate totals for `slug` over all records and the trailing 7-day
    /// and 30-day windows relative to the caller-supplied `now` (seconds).
    async fn summarize(&self, slug: &str, now: u64) -> Result<PaymentSummary, LedgerError>;
}
