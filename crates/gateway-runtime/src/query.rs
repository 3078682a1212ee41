//! # Query Service
//!
//! The read surface behind the dashboard and payment pages. The HTTP layer
//! that fronts it is a separate service; both of its endpoints map 1:1 onto
//! the ledger's read contracts.

use crate::config::QueryConfig;
use pg_02_ledger_store::{LedgerError, LedgerStore};
use shared_types::{LedgerRecord, PaymentSummary};
use std::sync::Arc;

/// Read-only view over the ledger store.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn LedgerStore>,
    config: QueryConfig,
}

impl QueryService {
    /// Create a query service over a store.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, config: QueryConfig) -> Self {
        Self { store, config }
    }

    /// Recent payments for a slug, newest-first.
    ///
    /// `limit` defaults to the configured page size and is clamped to the
    /// configured maximum. An unknown slug yields an empty page.
    pub async fn recent_payments(
        &self,
        slug: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LedgerRecord>, LedgerError> {
        let limit = limit
            .unwrap_or(self.config.default_page_limit)
            .min(self.config.max_page_limit);
        self.store.list_by_slug(slug, limit).await
    }

    /// Aggregate summary for a slug at a caller-supplied time.
    pub async fn summary(&self, slug: &str, now: u64) -> Result<PaymentSummary, LedgerError> {
        self.store.summarize(slug, now).await
    }
}
