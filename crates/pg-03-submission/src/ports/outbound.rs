//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the pipeline drives but does not own: the user's funding
//! wallet, the gateway contract, and the slug directory.

use crate::domain::TransferDraft;
use async_trait::async_trait;
use shared_types::{Address, TxHash};
use thiserror::Error;

/// Failure reported by the wallet, carried verbatim to the user.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct WalletError {
    /// Wallet-reported cause.
    pub message: String,
}

/// Failure reported by the network or the gateway contract, carried
/// verbatim to the user.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GatewayError {
    /// Network-reported cause.
    pub message: String,
}

/// Failure of the slug directory lookup.
#[derive(Debug, Clone, Error)]
#[error("Directory error: {message}")]
pub struct DirectoryError {
    /// Backend-reported cause.
    pub message: String,
}

/// A payee as resolved from a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverProfile {
    /// Current receiving address.
    pub address: Address,
    /// Name shown on the payment page.
    pub display_name: String,
}

/// The payer's funding connection.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Whether a funding connection is available at all.
    async fn is_connected(&self) -> bool;

    /// Network the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Code deployed at an address; empty for an externally-owned account.
    async fn code_at(&self, address: Address) -> Result<Vec<u8>, WalletError>;

    /// Ask the user to approve the transfer. An error is a rejection.
    async fn approve_transfer(&self, draft: &TransferDraft) -> Result<(), WalletError>;
}

/// The gateway contract's submission surface.
///
/// One operation is consumed here: transfer native value tagged with
/// `(slug, memo)`. Token-denominated variants are out of scope upstream of
/// this port; the pipeline refuses them before ever reaching it.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Broadcast the transfer. Returns the assigned transaction identity.
    async fn pay_native(&self, draft: &TransferDraft) -> Result<TxHash, GatewayError>;

    /// Resolve once the network reports the transaction mined.
    ///
    /// Callers bound this with a timeout; the port itself waits
    /// indefinitely.
    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<(), GatewayError>;
}

/// Slug-to-payee resolution.
///
/// Consulted once per submission to populate the receiver; results are
/// never cached beyond that.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Resolve a slug to its payee, or `None` if the slug is unclaimed.
    async fn resolve_slug(&self, slug: &str) -> Result<Option<ReceiverProfile>, DirectoryError>;
}
