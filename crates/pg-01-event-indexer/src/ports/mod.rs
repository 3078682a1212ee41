//! Ports layer: the ledger interface the indexer writes through.

pub mod outbound;

pub use outbound::{LedgerSink, SinkError, SinkOutcome};
