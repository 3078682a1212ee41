//! # Event Indexer (pg-01)
//!
//! The producer side of the gateway core. Holds one live subscription to the
//! payment contract's log topic, converts each delivered log into a ledger
//! record, and proposes it to the ledger through an idempotent insert.
//!
//! ## Delivery Assumptions
//!
//! The transport may re-deliver, lag, or disconnect. The indexer assumes
//! nothing about delivery count or ordering: correctness lives in the
//! ledger's dedup-insert, which is commutative per distinct transaction
//! identity. A disconnect triggers an automatic resubscribe after a backoff;
//! the fresh subscription replays the transport's retained backlog, so the
//! recovery path re-delivers rather than loses.
//!
//! ## Failure Handling
//!
//! - Malformed log: fatal to that single event; logged and dropped, never
//!   retried, never stops the subscription.
//! - Insert failure: logged and counted; the event stays recoverable through
//!   the transport's replay on the next resubscribe.
//! - Duplicate delivery: a successful no-op, counted for visibility.

pub mod domain;
pub mod ports;
pub mod service;

// Re-export main types for convenience
pub use domain::{normalize_log, IndexError, IndexerStats, IndexerStatsSnapshot};
pub use ports::{LedgerSink, SinkError, SinkOutcome};
pub use service::{EventIndexer, IndexerConfig};
