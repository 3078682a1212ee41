//! Adapters layer: store backends.

pub mod memory;
pub mod rocksdb_store;

pub use memory::MemoryLedgerStore;
pub use rocksdb_store::{RocksDbConfig, RocksDbLedgerStore};
