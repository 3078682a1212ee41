//! # Gateway Configuration
//!
//! Unified configuration for the runtime, with sane defaults and environment
//! overrides applied at startup.
//!
//! ## Production Requirements
//!
//! - `chain.contract_address` MUST NOT be the zero address in production;
//!   the indexer would subscribe to the native-asset sentinel and see
//!   nothing.

use shared_types::Address;
use std::path::PathBuf;

/// Complete gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Chain and contract configuration.
    pub chain: ChainConfig,
    /// Ledger storage configuration.
    pub storage: StorageConfig,
    /// Indexer configuration.
    pub indexer: IndexerSettings,
    /// Read surface configuration.
    pub query: QueryConfig,
}

impl GatewayConfig {
    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the gateway contract address is the zero address
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.chain.contract_address.is_zero() {
            return Err(ConfigError::MissingContractAddress);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// The gateway contract address is not set.
    MissingContractAddress,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingContractAddress => {
                write!(
                    f,
                    "Gateway contract address is the zero address. \
                     Set PG_CONTRACT_ADDRESS or provide it in config."
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Chain and contract configuration.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// The single supported network.
    pub chain_id: u64,
    /// Address of the payment gateway contract.
    pub contract_address: Address,
    /// Live event channel capacity.
    pub channel_capacity: usize,
    /// Replay backlog capacity.
    pub replay_capacity: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 80_002,
            contract_address: Address::ZERO, // MUST be overridden in production
            channel_capacity: chain_events::DEFAULT_CHANNEL_CAPACITY,
            replay_capacity: chain_events::DEFAULT_REPLAY_CAPACITY,
        }
    }
}

/// Ledger storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory store; contents are lost on restart.
    Memory,
    /// Durable RocksDB store.
    RocksDb,
}

/// Ledger storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend to open at startup.
    pub backend: StorageBackend,
    /// Data directory for the durable backend.
    pub data_dir: PathBuf,
    /// fsync each committed insert.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data/ledger"),
            sync_writes: true,
        }
    }
}

/// Indexer configuration.
#[derive(Debug, Clone)]
pub struct IndexerSettings {
    /// Delay before resubscribing after a transport disconnect, in seconds.
    pub reconnect_delay_secs: u64,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            reconnect_delay_secs: 1,
        }
    }
}

/// Read surface configuration.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Page size when the caller does not supply one.
    pub default_page_limit: usize,
    /// Upper bound on caller-supplied page sizes.
    pub max_page_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_limit: 100,
            max_page_limit: 1000,
        }
    }
}
