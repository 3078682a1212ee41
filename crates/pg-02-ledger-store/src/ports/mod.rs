//! Ports layer: the store API consumed by the indexer and the read surface.

pub mod inbound;

pub use inbound::{InsertOutcome, LedgerStore};
