//! # Chain-Backed Adapters
//!
//! [`WalletConnector`] and [`GatewayClient`] implementations over
//! [`InMemoryChain`]. The wallet reads chain state (network id, deployed
//! code) the way an injected browser wallet would; the gateway submits the
//! validated transfer through the contract, which is what makes the
//! `Payment` event the indexer later observes.

use crate::domain::TransferDraft;
use crate::ports::{GatewayClient, GatewayError, WalletConnector, WalletError};
use async_trait::async_trait;
use chain_events::InMemoryChain;
use shared_types::{Address, TxHash};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// A funding wallet connected to the emulated chain.
pub struct ChainWallet {
    chain: Arc<InMemoryChain>,
    connected: AtomicBool,
    rejecting: AtomicBool,
}

impl ChainWallet {
    /// Create a connected, auto-approving wallet.
    #[must_use]
    pub fn new(chain: Arc<InMemoryChain>) -> Self {
        Self {
            chain,
            connected: AtomicBool::new(true),
            rejecting: AtomicBool::new(false),
        }
    }

    /// Connect or disconnect the wallet.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    /// Make the wallet decline approval prompts.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::Relaxed);
    }
}

#[async_trait]
impl WalletConnector for ChainWallet {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain.chain_id())
    }

    async fn code_at(&self, address: Address) -> Result<Vec<u8>, WalletError> {
        Ok(self.chain.code_at(address))
    }

    async fn approve_transfer(&self, draft: &TransferDraft) -> Result<(), WalletError> {
        if self.rejecting.load(Ordering::Relaxed) {
            return Err(WalletError {
                message: "user denied transaction signature".to_string(),
            });
        }
        debug!(attempt = %draft.attempt_id, amount = %draft.amount, "Transfer approved in wallet");
        Ok(())
    }
}

/// Gateway client submitting through the emulated chain's contract.
pub struct ChainGateway {
    chain: Arc<InMemoryChain>,
    payer: Address,
}

impl ChainGateway {
    /// Create a gateway client paying from `payer`.
    #[must_use]
    pub fn new(chain: Arc<InMemoryChain>, payer: Address) -> Self {
        Self { chain, payer }
    }
}

#[async_trait]
impl GatewayClient for ChainGateway {
    async fn pay_native(&self, draft: &TransferDraft) -> Result<TxHash, GatewayError> {
        let receipt = self
            .chain
            .submit_native_transfer(
                self.payer,
                draft.receiver,
                draft.amount,
                &draft.slug,
                &draft.memo,
                now_secs(),
            )
            .map_err(|e| GatewayError {
                message: e.to_string(),
            })?;
        Ok(receipt.tx_hash)
    }

    async fn await_confirmation(&self, _tx_hash: TxHash) -> Result<(), GatewayError> {
        // The emulated chain finalizes at submission time.
        Ok(())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
