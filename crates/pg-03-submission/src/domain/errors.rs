//! Submission error taxonomy.
//!
//! Each validation step has its own variant so the caller always gets the
//! first applicable, user-actionable failure. Wallet, broadcast, and
//! confirmation causes are carried verbatim.

use shared_types::Address;
use thiserror::Error;

/// Errors from the submission pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// No funding connection is available. An environment problem, not a
    /// problem with the submitted values.
    #[error("No funding connection available")]
    WalletUnavailable,

    /// The wallet is on a different network than the gateway contract.
    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The receiver is not a well-formed account address.
    #[error("Invalid receiver address: {input:?}")]
    InvalidReceiver { input: String },

    /// The amount is not a finite, strictly positive decimal.
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// The receiver has deployed code; a direct value transfer would revert
    /// or be lost.
    #[error("Receiver {receiver} is a contract address, not a wallet")]
    ContractReceiver { receiver: Address },

    /// The payment link does not resolve to a payee.
    #[error("Unknown payment link: {slug:?}")]
    UnknownSlug { slug: String },

    /// Token transfers other than the native asset are not implemented.
    #[error("Token transfers are not supported, pay with the native asset")]
    UnsupportedToken,

    /// The user declined the transfer in the wallet.
    #[error("Wallet rejected the transfer: {reason}")]
    WalletRejected { reason: String },

    /// The network refused or failed the broadcast.
    #[error("Broadcast failed: {reason}")]
    BroadcastFailed { reason: String },

    /// The network reported a failure while waiting for inclusion.
    #[error("Confirmation failed: {reason}")]
    ConfirmationFailed { reason: String },

    /// No inclusion was observed within the confirmation bound. This does
    /// not assert the transfer failed; the chain remains the source of
    /// truth.
    #[error("Confirmation timed out after {timeout_secs}s; the transfer may still be mined")]
    ConfirmationTimeout { timeout_secs: u64 },

    /// A prior submission is still between broadcast and confirmation.
    #[error("A submission is already in flight")]
    SubmissionInFlight,
}
