//! # Indexer Counters
//!
//! Operational counters for the indexing loop. `insert_failures` and the
//! subscription's lag count together form the recorded-gap signal an
//! external backfill would key off.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, shared between the run loop and observers.
#[derive(Debug, Default)]
pub struct IndexerStats {
    /// Records stored by this indexer.
    pub indexed: AtomicU64,
    /// Deliveries resolved as already-present.
    pub deduplicated: AtomicU64,
    /// Events dropped as undecodable.
    pub malformed: AtomicU64,
    /// Insert attempts that failed against the store.
    pub insert_failures: AtomicU64,
    /// Times the subscription was re-established after a disconnect.
    pub reconnects: AtomicU64,
}

impl IndexerStats {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent-enough point-in-time copy for logging and queries.
    #[must_use]
    pub fn snapshot(&self) -> IndexerStatsSnapshot {
        IndexerStatsSnapshot {
            indexed: self.indexed.load(Ordering::Relaxed),
            deduplicated: self.deduplicated.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            insert_failures: self.insert_failures.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`IndexerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexerStatsSnapshot {
    pub indexed: u64,
    pub deduplicated: u64,
    pub malformed: u64,
    pub insert_failures: u64,
    pub reconnects: u64,
}
