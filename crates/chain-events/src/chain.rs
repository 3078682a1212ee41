//! # In-Memory Chain
//!
//! Emulated gateway chain used as the reference [`EventSource`]. It accepts
//! native-value submissions, assigns transaction identities, and broadcasts
//! `Payment` logs to subscribers with the replay semantics a production log
//! transport is expected to provide.

use crate::log::{LogFilter, PaymentLog, RawLog};
use crate::source::{EventSource, LogSubscription};
use crate::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_REPLAY_CAPACITY};
use parking_lot::{Mutex, RwLock};
use shared_types::{Address, TxHash, U256};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from chain submission.
#[derive(Debug, Error, Clone)]
pub enum ChainError {
    /// The log body could not be encoded for the wire.
    #[error("Log codec error: {message}")]
    Codec { message: String },
}

/// Receipt for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Identity assigned to the submitted transaction.
    pub tx_hash: TxHash,
}

/// Connection state guarded together so interrupt-and-resubscribe is atomic.
struct ChainInner {
    /// Live broadcast sender; replaced wholesale on [`InMemoryChain::interrupt`].
    sender: tokio::sync::broadcast::Sender<RawLog>,
    /// Bounded backlog replayed to fresh subscriptions.
    replay: VecDeque<RawLog>,
    /// Next transport sequence number.
    next_sequence: u64,
    /// Next nonce folded into derived transaction identities.
    next_nonce: u64,
}

/// Broadcast-backed emulated chain.
///
/// Subscriptions created through [`EventSource::subscribe`] first drain the
/// retained replay backlog, then follow live emissions. [`interrupt`]
/// simulates a transport-level disconnect: live subscriptions end and a
/// resubscribe re-delivers the backlog, so nothing retained is lost.
///
/// [`interrupt`]: InMemoryChain::interrupt
pub struct InMemoryChain {
    /// Network identifier reported to wallets.
    chain_id: u64,

    /// Address of the payment gateway contract emitting `Payment` logs.
    gateway: Address,

    /// Live channel capacity.
    capacity: usize,

    /// Replay backlog capacity.
    replay_capacity: usize,

    /// Connection state.
    inner: Mutex<ChainInner>,

    /// Deployed code by address; absent or empty means externally owned.
    code: RwLock<HashMap<Address, Vec<u8>>>,

    /// Total logs emitted.
    logs_emitted: AtomicU64,
}

impl InMemoryChain {
    /// Create a chain with default capacities.
    #[must_use]
    pub fn new(chain_id: u64, gateway: Address) -> Self {
        Self::with_capacity(
            chain_id,
            gateway,
            DEFAULT_CHANNEL_CAPACITY,
            DEFAULT_REPLAY_CAPACITY,
        )
    }

    /// Create a chain with explicit channel and replay capacities.
    #[must_use]
    pub fn with_capacity(
        chain_id: u64,
        gateway: Address,
        capacity: usize,
        replay_capacity: usize,
    ) -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(capacity);
        Self {
            chain_id,
            gateway,
            capacity,
            replay_capacity,
            inner: Mutex::new(ChainInner {
                sender,
                replay: VecDeque::with_capacity(replay_capacity),
                next_sequence: 0,
                next_nonce: 0,
            }),
            code: RwLock::new(HashMap::new()),
            logs_emitted: AtomicU64::new(0),
        }
    }

    /// Network identifier of this chain.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Address of the payment gateway contract.
    #[must_use]
    pub fn gateway_address(&self) -> Address {
        self.gateway
    }

    /// Register deployed code at an address.
    ///
    /// Addresses with non-empty code fail the pipeline's externally-owned
    /// account check.
    pub fn set_code(&self, address: Address, code: Vec<u8>) {
        self.code.write().insert(address, code);
    }

    /// Code deployed at an address; empty for an externally-owned account.
    #[must_use]
    pub fn code_at(&self, address: Address) -> Vec<u8> {
        self.code.read().get(&address).cloned().unwrap_or_default()
    }

    /// Submit a native-value transfer through the gateway contract.
    ///
    /// The transfer is final once accepted: a `Payment` log is emitted and a
    /// receipt with the assigned transaction identity is returned.
    pub fn submit_native_transfer(
        &self,
        payer: Address,
        receiver: Address,
        amount: U256,
        slug: &str,
        memo: &str,
        timestamp: u64,
    ) -> Result<SubmitReceipt, ChainError> {
        self.emit_payment(PaymentLog {
            payer,
            receiver,
            token: Address::ZERO,
            amount,
            slug: slug.to_string(),
            memo: memo.to_string(),
            timestamp,
        })
    }

    /// Emit a `Payment` log with a derived transaction identity.
    pub fn emit_payment(&self, log: PaymentLog) -> Result<SubmitReceipt, ChainError> {
        let data = log.encode().map_err(|e| ChainError::Codec {
            message: e.to_string(),
        })?;

        let mut inner = self.inner.lock();
        let tx_hash = derive_tx_hash(&log, inner.next_nonce);
        inner.next_nonce += 1;
        let receipt = self.emit_locked(&mut inner, tx_hash, data);
        Ok(receipt)
    }

    /// Emit raw wire bytes as a log.
    ///
    /// Exists so tests can deliver undecodable events through the same
    /// transport path a real malformed emission would take.
    pub fn emit_raw(&self, data: Vec<u8>) -> SubmitReceipt {
        let mut inner = self.inner.lock();
        let mut seed = data.clone();
        seed.extend_from_slice(&inner.next_nonce.to_le_bytes());
        let tx_hash = TxHash::keccak(&seed);
        inner.next_nonce += 1;
        self.emit_locked(&mut inner, tx_hash, data)
    }

    /// Re-deliver an already-identified log, e.g. a duplicate delivery.
    ///
    /// The transaction identity is preserved, which is exactly what makes the
    /// duplicate detectable downstream.
    pub fn redeliver(&self, log: &RawLog) {
        let mut inner = self.inner.lock();
        let raw = RawLog {
            sequence: inner.next_sequence,
            ..log.clone()
        };
        inner.next_sequence += 1;
        self.broadcast(&mut inner, raw);
    }

    /// Simulate a transport-level disconnect.
    ///
    /// Live subscriptions observe end-of-stream after draining; the replay
    /// backlog survives, so a resubscribe recovers everything retained.
    pub fn interrupt(&self) {
        let mut inner = self.inner.lock();
        let (sender, _) = tokio::sync::broadcast::channel(self.capacity);
        inner.sender = sender;
        warn!("Chain connection interrupted, live subscribers dropped");
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().sender.receiver_count()
    }

    /// Total logs emitted over the lifetime of this chain.
    #[must_use]
    pub fn logs_emitted(&self) -> u64 {
        self.logs_emitted.load(Ordering::Relaxed)
    }

    fn emit_locked(
        &self,
        inner: &mut ChainInner,
        tx_hash: TxHash,
        data: Vec<u8>,
    ) -> SubmitReceipt {
        let raw = RawLog {
            contract: self.gateway,
            tx_hash,
            sequence: inner.next_sequence,
            data,
        };
        inner.next_sequence += 1;

        if inner.replay.len() == self.replay_capacity {
            inner.replay.pop_front();
        }
        inner.replay.push_back(raw.clone());

        self.broadcast(inner, raw);
        SubmitReceipt { tx_hash }
    }

    fn broadcast(&self, inner: &mut ChainInner, raw: RawLog) {
        self.logs_emitted.fetch_add(1, Ordering::Relaxed);
        match inner.sender.send(raw) {
            Ok(receivers) => {
                debug!(receivers, "Payment log emitted");
            }
            Err(_) => {
                // No live subscribers; the replay backlog still has it
                debug!("Payment log emitted with no live subscribers");
            }
        }
    }
}

impl EventSource for InMemoryChain {
    fn subscribe(&self, filter: LogFilter) -> LogSubscription {
        let inner = self.inner.lock();
        let backlog: VecDeque<RawLog> = inner
            .replay
            .iter()
            .filter(|log| filter.matches(log))
            .cloned()
            .collect();
        let receiver = inner.sender.subscribe();
        debug!(backlog = backlog.len(), "New log subscription");
        LogSubscription::new(backlog, receiver, filter)
    }
}

/// Derives a transaction identity from the log body and a chain nonce.
fn derive_tx_hash(log: &PaymentLog, nonce: u64) -> TxHash {
    let mut seed = Vec::with_capacity(128);
    seed.extend_from_slice(log.payer.as_bytes());
    seed.extend_from_slice(log.receiver.as_bytes());
    seed.extend_from_slice(log.token.as_bytes());
    let mut amount_bytes = [0u8; 32];
    log.amount.to_big_endian(&mut amount_bytes);
    seed.extend_from_slice(&amount_bytes);
    seed.extend_from_slice(log.slug.as_bytes());
    seed.extend_from_slice(log.memo.as_bytes());
    seed.extend_from_slice(&log.timestamp.to_le_bytes());
    seed.extend_from_slice(&nonce.to_le_bytes());
    TxHash::keccak(&seed)
}
