//! # Indexing Service
//!
//! The long-lived run loop tying the transport subscription to the ledger
//! sink.

use crate::domain::{normalize_log, IndexerStats};
use crate::ports::{LedgerSink, SinkOutcome};
use chain_events::{EventSource, LogFilter, RawLog};
use shared_types::Address;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Indexer configuration.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Gateway contract whose logs are indexed.
    pub contract: Address,
    /// Delay before resubscribing after a transport disconnect.
    pub reconnect_delay: Duration,
}

impl IndexerConfig {
    /// Config with the default reconnect backoff.
    #[must_use]
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            reconnect_delay: Duration::from_secs(1),
        }
    }
}

/// The event indexer: one subscription, one sink, one task.
pub struct EventIndexer<S, L> {
    source: Arc<S>,
    sink: Arc<L>,
    config: IndexerConfig,
    stats: Arc<IndexerStats>,
}

impl<S, L> EventIndexer<S, L>
where
    S: EventSource,
    L: LedgerSink,
{
    /// Create an indexer over a transport and a ledger sink.
    pub fn new(source: Arc<S>, sink: Arc<L>, config: IndexerConfig) -> Self {
        Self {
            source,
            sink,
            config,
            stats: Arc::new(IndexerStats::new()),
        }
    }

    /// Shared handle to the live counters.
    #[must_use]
    pub fn stats(&self) -> Arc<IndexerStats> {
        Arc::clone(&self.stats)
    }

    /// Run until the shutdown signal flips to `true`.
    ///
    /// The subscription is re-established after every transport disconnect;
    /// each resubscribe replays the transport's retained backlog, so events
    /// emitted during the outage are re-delivered and deduplicated rather
    /// than lost.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(contract = %self.config.contract, "Event indexer started");

        'connect: loop {
            let mut subscription = self
                .source
                .subscribe(LogFilter::contract(self.config.contract));

            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break 'connect;
                        }
                    }
                    delivery = subscription.recv() => {
                        match delivery {
                            Some(raw) => self.process(raw).await,
                            None => {
                                self.stats.reconnects.fetch_add(1, Ordering::Relaxed);
                                let gap = subscription.lagged_total();
                                if gap > 0 {
                                    warn!(gap, "Subscription lagged before disconnect");
                                }
                                warn!(
                                    delay_ms = self.config.reconnect_delay.as_millis() as u64,
                                    "Log subscription closed, resubscribing"
                                );
                                tokio::select! {
                                    _ = tokio::time::sleep(self.config.reconnect_delay) => {}
                                    changed = shutdown.changed() => {
                                        if changed.is_err() || *shutdown.borrow() {
                                            break 'connect;
                                        }
                                    }
                                }
                                continue 'connect;
                            }
                        }
                    }
                }
            }
        }

        info!("Event indexer stopped");
    }

    /// Handle one delivered log.
    async fn process(&self, raw: RawLog) {
        let record = match normalize_log(&raw) {
            Ok(record) => record,
            Err(e) => {
                self.stats.malformed.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Dropping malformed event");
                return;
            }
        };

        let slug = record.slug.clone();
        let amount = record.amount;
        let tx = record.tx_identity;

        match self.sink.insert_if_absent(record).await {
            Ok(SinkOutcome::Inserted) => {
                self.stats.indexed.fetch_add(1, Ordering::Relaxed);
                info!(slug = %slug, amount = %amount, tx = %tx, "Indexed payment");
            }
            Ok(SinkOutcome::AlreadyPresent) => {
                self.stats.deduplicated.fetch_add(1, Ordering::Relaxed);
                debug!(tx = %tx, "Duplicate delivery, already indexed");
            }
            Err(e) => {
                self.stats.insert_failures.fetch_add(1, Ordering::Relaxed);
                error!(tx = %tx, error = %e, "Ledger insert failed");
            }
        }
    }
}
