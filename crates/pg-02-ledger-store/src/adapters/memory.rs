//! # In-Memory Ledger Store
//!
//! Reference adapter backed by a `parking_lot::RwLock`. The write path is a
//! compare-and-insert inside one write-lock section, which is what makes
//! same-identity races resolve to a single winner. The per-slug all-time
//! totals are maintained in that same section, so `summarize` can serve the
//! all-time figures without a scan while the windowed figures are recomputed
//! from raw rows.

use crate::domain::{summarize_records, LedgerError};
use crate::ports::{InsertOutcome, LedgerStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{LedgerRecord, PaymentSummary, TxHash, WindowTotals};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
struct Inner {
    /// Append-only record arena in insertion order.
    records: Vec<Arc<LedgerRecord>>,
    /// Dedup index: transaction identity to arena position.
    by_tx: HashMap<TxHash, usize>,
    /// Per-slug arena positions in insertion order.
    by_slug: HashMap<String, Vec<usize>>,
    /// Incrementally maintained all-time totals per slug.
    totals: HashMap<String, WindowTotals>,
}

/// In-memory [`LedgerStore`] adapter.
#[derive(Default)]
pub struct MemoryLedgerStore {
    inner: RwLock<Inner>,
}

impl MemoryLedgerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all slugs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// True when no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn insert_if_absent(
        &self,
        record: LedgerRecord,
    ) -> Result<InsertOutcome, LedgerError> {
        let mut inner = self.inner.write();
        if inner.by_tx.contains_key(&record.tx_identity) {
            return Ok(InsertOutcome::AlreadyPresent);
        }

        let position = inner.records.len();
        inner.by_tx.insert(record.tx_identity, position);
        inner
            .by_slug
            .entry(record.slug.clone())
            .or_default()
            .push(position);
        inner
            .totals
            .entry(record.slug.clone())
            .or_default()
            .add(record.amount);
        debug!(slug = %record.slug, tx = %record.tx_identity, "Ledger record stored");
        inner.records.push(Arc::new(record));

        Ok(InsertOutcome::Inserted)
    }

    async fn list_by_slug(
        &self,
        slug: &str,
        limit: usize,
    ) -> Result<Vec<LedgerRecord>, LedgerError> {
        let inner = self.inner.read();
        let Some(positions) = inner.by_slug.get(slug) else {
            return Ok(Vec::new());
        };
        Ok(positions
            .iter()
            .rev()
            .take(limit)
            .map(|&p| (*inner.records[p]).clone())
            .collect())
    }

    async fn summarize(&self, slug: &str, now: u64) -> Result<PaymentSummary, LedgerError> {
        let inner = self.inner.read();
        let Some(positions) = inner.by_slug.get(slug) else {
            return Ok(PaymentSummary::default());
        };

        let mut summary =
            summarize_records(positions.iter().map(|&p| &*inner.records[p]), now);

        // The maintained counter and the recomputed figure must agree; serve
        // the counter so the all-time path stays O(1) in record count.
        if let Some(totals) = inner.totals.get(slug) {
            debug_assert_eq!(summary.total, *totals);
            summary.total = *totals;
        }
        Ok(summary)
    }
}
