//! # Ledger Sink Adapter
//!
//! Bridges the indexer's write port onto a [`LedgerStore`].

use async_trait::async_trait;
use pg_01_event_indexer::{LedgerSink, SinkError, SinkOutcome};
use pg_02_ledger_store::{InsertOutcome, LedgerStore};
use shared_types::LedgerRecord;
use std::sync::Arc;

/// Adapter giving the indexer write access to the ledger store.
pub struct LedgerSinkAdapter {
    store: Arc<dyn LedgerStore>,
}

impl LedgerSinkAdapter {
    /// Wrap a store as an indexer sink.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LedgerSink for LedgerSinkAdapter {
    async fn insert_if_absent(&self, record: LedgerRecord) -> Result<SinkOutcome, SinkError> {
        match self.store.insert_if_absent(record).await {
            Ok(InsertOutcome::Inserted) => Ok(SinkOutcome::Inserted),
            Ok(InsertOutcome::AlreadyPresent) => Ok(SinkOutcome::AlreadyPresent),
            Err(e) => Err(SinkError {
                message: e.to_string(),
            }),
        }
    }
}
