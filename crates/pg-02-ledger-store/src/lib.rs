//! # Ledger Store & Aggregator (pg-02)
//!
//! The gateway's local consistency domain: an append-mostly collection of
//! [`shared_types::LedgerRecord`]s keyed by payee slug.
//!
//! ## Responsibilities
//!
//! - Idempotent inserts, deduplicated by transaction identity
//! - Point lookups: newest-first listing per slug
//! - On-demand windowed aggregation (7-day / 30-day / all-time)
//!
//! ## Write/Read Split
//!
//! The indexer is the only writer and only ever proposes inserts; readers
//! never mutate. Records are immutable once stored and are never deleted.
//!
//! ## Concurrency
//!
//! `insert_if_absent` races on the same transaction identity resolve to
//! exactly one winner; the losers observe `AlreadyPresent`, never an error.
//! Both adapters enforce this with a compare-and-insert inside a single
//! critical section. Reads observe consistent snapshots and do not serialize
//! against inserts for other slugs.

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-export main types for convenience
pub use adapters::{MemoryLedgerStore, RocksDbConfig, RocksDbLedgerStore};
pub use domain::{summarize_records, LedgerError};
pub use ports::{InsertOutcome, LedgerStore};
