//! # PayLink Gateway Runtime
//!
//! Wires the gateway core together: the chain transport, the ledger store,
//! the event indexer task, and the read surface.
//!
//! ## Flow
//!
//! ```text
//! Submission Pipeline ──payNative──→ Gateway Contract
//!                                         │
//!                                    Payment log
//!                                         │
//!                                         ▼
//!                      Event Indexer ──insert──→ Ledger Store
//!                                                     │
//!                      Query Service ←──reads─────────┘
//! ```
//!
//! The submission side never writes the ledger; everything the dashboard
//! shows was observed on-chain by the indexer.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + environment overrides)
//! 2. Open the ledger store (memory or RocksDB)
//! 3. Spawn the indexer task with a watch-channel shutdown signal
//! 4. Serve reads through [`QueryService`]

pub mod adapters;
pub mod config;
pub mod query;

pub use adapters::{InMemoryDirectory, LedgerSinkAdapter};
pub use config::{GatewayConfig, StorageBackend};
pub use query::QueryService;

use anyhow::{Context, Result};
use chain_events::InMemoryChain;
use parking_lot::Mutex;
use pg_01_event_indexer::{EventIndexer, IndexerConfig, IndexerStats, IndexerStatsSnapshot};
use pg_02_ledger_store::{LedgerStore, MemoryLedgerStore, RocksDbConfig, RocksDbLedgerStore};
use pg_03_submission::{ChainGateway, ChainWallet, PipelineConfig, SubmissionPipeline};
use shared_types::Address;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The gateway runtime orchestrating all subsystems.
pub struct GatewayRuntime {
    config: GatewayConfig,
    chain: Arc<InMemoryChain>,
    store: Arc<dyn LedgerStore>,
    directory: Arc<InMemoryDirectory>,
    indexer_stats: Mutex<Option<Arc<IndexerStats>>>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl GatewayRuntime {
    /// Create a runtime with configuration.
    ///
    /// Opens the configured ledger backend; a durable backend that cannot be
    /// opened is a startup failure, not something to limp past.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let chain = Arc::new(InMemoryChain::with_capacity(
            config.chain.chain_id,
            config.chain.contract_address,
            config.chain.channel_capacity,
            config.chain.replay_capacity,
        ));

        let store: Arc<dyn LedgerStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryLedgerStore::new()),
            StorageBackend::RocksDb => Arc::new(
                RocksDbLedgerStore::open(RocksDbConfig {
                    path: config.storage.data_dir.to_string_lossy().to_string(),
                    sync_writes: config.storage.sync_writes,
                    ..Default::default()
                })
                .context("Failed to open ledger database")?,
            ),
        };

        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Ok(Self {
            config,
            chain,
            store,
            directory: Arc::new(InMemoryDirectory::new()),
            indexer_stats: Mutex::new(None),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Start the runtime: spawn the indexer task.
    pub fn start(&self) {
        info!("===========================================");
        info!("  PayLink Gateway Runtime v0.1.0");
        info!("===========================================");
        info!("Chain ID: {}", self.config.chain.chain_id);
        info!("Contract: {}", self.config.chain.contract_address);
        info!("Storage:  {:?}", self.config.storage.backend);

        let sink = Arc::new(LedgerSinkAdapter::new(Arc::clone(&self.store)));
        let indexer = EventIndexer::new(
            Arc::clone(&self.chain),
            sink,
            IndexerConfig {
                contract: self.config.chain.contract_address,
                reconnect_delay: Duration::from_secs(
                    self.config.indexer.reconnect_delay_secs,
                ),
            },
        );
        *self.indexer_stats.lock() = Some(indexer.stats());

        let shutdown_rx = self.shutdown_rx.clone();
        tokio::spawn(indexer.run(shutdown_rx));

        info!("Gateway core initialized and running");
    }

    /// Shutdown the runtime gracefully.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);
        // Give the indexer time to observe the signal
        tokio::time::sleep(Duration::from_millis(200)).await;
        info!("Shutdown complete");
    }

    /// The chain transport handle.
    #[must_use]
    pub fn chain(&self) -> Arc<InMemoryChain> {
        Arc::clone(&self.chain)
    }

    /// The ledger store handle.
    #[must_use]
    pub fn store(&self) -> Arc<dyn LedgerStore> {
        Arc::clone(&self.store)
    }

    /// The slug directory handle.
    #[must_use]
    pub fn directory(&self) -> Arc<InMemoryDirectory> {
        Arc::clone(&self.directory)
    }

    /// The read surface served to the HTTP layer.
    #[must_use]
    pub fn query(&self) -> QueryService {
        QueryService::new(Arc::clone(&self.store), self.config.query.clone())
    }

    /// A submission pipeline for one payer session.
    #[must_use]
    pub fn payer_session(
        &self,
        payer: Address,
    ) -> SubmissionPipeline<ChainWallet, ChainGateway, InMemoryDirectory> {
        SubmissionPipeline::new(
            Arc::new(ChainWallet::new(Arc::clone(&self.chain))),
            Arc::new(ChainGateway::new(Arc::clone(&self.chain), payer)),
            Arc::clone(&self.directory),
            PipelineConfig::new(self.config.chain.chain_id),
        )
    }

    /// Indexer counters, if the indexer has been started.
    #[must_use]
    pub fn indexer_stats(&self) -> Option<IndexerStatsSnapshot> {
        self.indexer_stats
            .lock()
            .as_ref()
            .map(|stats| stats.snapshot())
    }
}
