//! # RocksDB Ledger Store
//!
//! Durable adapter for production use.
//!
//! ## Column Families
//!
//! - `records` - transaction identity → encoded record (the dedup index is
//!   the primary key itself)
//! - `slug_index` - slug + inverted insert sequence → transaction identity,
//!   so a forward prefix iteration yields newest-first
//! - `meta` - insert sequence counter
//!
//! ## Write Path
//!
//! Inserts serialize on a single gate holding the next sequence number: the
//! existence check and the batch write happen inside the gate, which is the
//! compare-and-insert that keeps same-identity races to one winner. The
//! record, the slug index entry, and the advanced sequence counter are
//! committed in one atomic `WriteBatch`.

use crate::domain::{summarize_records, LedgerError};
use crate::ports::{InsertOutcome, LedgerStore};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use rocksdb::{ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use shared_types::{LedgerRecord, PaymentSummary, TxHash};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Column family for records keyed by transaction identity.
pub const CF_RECORDS: &str = "records";
/// Column family for the per-slug recency index.
pub const CF_SLUG_INDEX: &str = "slug_index";
/// Column family for store metadata.
pub const CF_META: &str = "meta";

/// All column families used by the ledger.
pub const COLUMN_FAMILIES: &[&str] = &[CF_RECORDS, CF_SLUG_INDEX, CF_META];

const META_NEXT_SEQ: &[u8] = b"next_seq";

/// Separator between slug bytes and the sequence suffix in `slug_index`
/// keys. 0xFF never occurs in UTF-8 text, so slugs cannot collide across the
/// boundary.
const SLUG_KEY_SEPARATOR: u8 = 0xFF;

/// RocksDB configuration for the ledger.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory.
    pub path: String,
    /// Write buffer size in bytes.
    pub write_buffer_size: usize,
    /// fsync each committed insert.
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/ledger".to_string(),
            write_buffer_size: 64 * 1024 * 1024, // 64MB
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Config for tests (small buffers, no fsync).
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            sync_writes: false,
        }
    }
}

/// Durable [`LedgerStore`] adapter backed by RocksDB.
pub struct RocksDbLedgerStore {
    db: Arc<RwLock<DB>>,
    /// Insert gate; holds the next insert sequence number.
    insert_gate: Mutex<u64>,
    config: RocksDbConfig,
}

impl RocksDbLedgerStore {
    /// Open or create the ledger database.
    pub fn open(config: RocksDbConfig) -> Result<Self, LedgerError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(LedgerError::storage)?;

        let meta_cf = db.cf_handle(CF_META).ok_or_else(|| LedgerError::Storage {
            message: "missing meta column family".to_string(),
        })?;
        let next_seq = match db.get_cf(meta_cf, META_NEXT_SEQ).map_err(LedgerError::storage)? {
            Some(bytes) => {
                if bytes.len() != 8 {
                    return Err(LedgerError::Codec {
                        message: "meta sequence counter has wrong width".to_string(),
                    });
                }
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes);
                u64::from_be_bytes(buf)
            }
            None => 0,
        };

        debug!(path = %config.path, next_seq, "Ledger database opened");
        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            insert_gate: Mutex::new(next_seq),
            config,
        })
    }

    /// Open at a path with default settings.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    fn slug_index_key(slug: &str, sequence: u64) -> Vec<u8> {
        let mut key = Vec::with_capacity(slug.len() + 9);
        key.extend_from_slice(slug.as_bytes());
        key.push(SLUG_KEY_SEPARATOR);
        // Inverted sequence: forward iteration yields newest-first.
        key.extend_from_slice(&(u64::MAX - sequence).to_be_bytes());
        key
    }

    fn slug_prefix(slug: &str) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(slug.len() + 1);
        prefix.extend_from_slice(slug.as_bytes());
        prefix.push(SLUG_KEY_SEPARATOR);
        prefix
    }

    /// Transaction identities for `slug`, newest-first, up to `limit`.
    fn scan_slug(&self, slug: &str, limit: usize) -> Result<Vec<TxHash>, LedgerError> {
        let db = self.db.read();
        let cf = db.cf_handle(CF_SLUG_INDEX).ok_or_else(|| LedgerError::Storage {
            message: "missing slug_index column family".to_string(),
        })?;

        let prefix = Self::slug_prefix(slug);
        let mut identities = Vec::new();
        for item in db.iterator_cf(cf, IteratorMode::From(prefix.as_slice(), Direction::Forward)) {
            let (key, value) = item.map_err(LedgerError::storage)?;
            if !key.starts_with(&prefix) || identities.len() == limit {
                break;
            }
            if value.len() != 32 {
                return Err(LedgerError::Codec {
                    message: "slug index entry has wrong width".to_string(),
                });
            }
            let mut hash = [0u8; 32];
            hash.copy_from_slice(&value);
            identities.push(TxHash(hash));
        }
        Ok(identities)
    }

    fn load_record(&self, tx: &TxHash) -> Result<Option<LedgerRecord>, LedgerError> {
        let db = self.db.read();
        let cf = db.cf_handle(CF_RECORDS).ok_or_else(|| LedgerError::Storage {
            message: "missing records column family".to_string(),
        })?;
        match db.get_cf(cf, tx.as_bytes()).map_err(LedgerError::storage)? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(LedgerError::codec)?,
            )),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LedgerStore for RocksDbLedgerStore {
    async fn insert_if_absent(
        &self,
        record: LedgerRecord,
    ) -> Result<InsertOutcome, LedgerError> {
        let encoded = bincode::serialize(&record).map_err(LedgerError::codec)?;

        let mut next_seq = self.insert_gate.lock();

        if self.load_record(&record.tx_identity)?.is_some() {
            return Ok(InsertOutcome::AlreadyPresent);
        }

        let sequence = *next_seq;
        {
            let db = self.db.read();
            let records_cf =
                db.cf_handle(CF_RECORDS).ok_or_else(|| LedgerError::Storage {
                    message: "missing records column family".to_string(),
                })?;
            let index_cf =
                db.cf_handle(CF_SLUG_INDEX).ok_or_else(|| LedgerError::Storage {
                    message: "missing slug_index column family".to_string(),
                })?;
            let meta_cf = db.cf_handle(CF_META).ok_or_else(|| LedgerError::Storage {
                message: "missing meta column family".to_string(),
            })?;

            let mut batch = WriteBatch::default();
            batch.put_cf(records_cf, record.tx_identity.as_bytes(), &encoded);
            batch.put_cf(
                index_cf,
                Self::slug_index_key(&record.slug, sequence),
                record.tx_identity.as_bytes(),
            );
            batch.put_cf(meta_cf, META_NEXT_SEQ, (sequence + 1).to_be_bytes());

            let mut write_opts = WriteOptions::default();
            write_opts.set_sync(self.config.sync_writes);
            db.write_opt(batch, &write_opts)
                .map_err(LedgerError::storage)?;
        }

        *next_seq = sequence + 1;
        debug!(slug = %record.slug, tx = %record.tx_identity, sequence, "Ledger record committed");
        Ok(InsertOutcome::Inserted)
    }

    async fn list_by_slug(
        &self,
        slug: &str,
        limit: usize,
    ) -> Result<Vec<LedgerRecord>, LedgerError> {
        let mut records = Vec::new();
        for tx in self.scan_slug(slug, limit)? {
            // Index entries and records are committed atomically, so a
            // missing record is corruption, not a race.
            let record = self.load_record(&tx)?.ok_or_else(|| LedgerError::Storage {
                message: format!("slug index points at missing record {tx}"),
            })?;
            records.push(record);
        }
        Ok(records)
    }

    async fn summarize(&self, slug: &str, now: u64) -> Result<PaymentSummary, LedgerError> {
        let mut records = Vec::new();
        for tx in self.scan_slug(slug, usize::MAX)? {
            let record = self.load_record(&tx)?.ok_or_else(|| LedgerError::Storage {
                message: format!("slug index points at missing record {tx}"),
            })?;
            records.push(record);
        }
        Ok(summarize_records(records.iter(), now))
    }
}
