//! # Payment Submission Pipeline (pg-03)
//!
//! The payer-side pre-flight machine. A transfer is only ever broadcast after
//! an ordered validation pass, and a broadcast is never retried: once value
//! may have moved on-chain, the only safe retry is a fresh, user-initiated
//! submission.
//!
//! ## State Machine
//!
//! ```text
//! [Idle] → [Validating] → [AwaitingWalletApproval] → [Broadcasting]
//!                                                          │
//!                                     [Confirmed] ← [AwaitingConfirmation]
//! ```
//!
//! `Errored` is reachable from every non-terminal state; `Confirmed` is
//! terminal. Transitions consume the submission value, so an invalid
//! transition is a compile error, and the pipeline additionally rejects a
//! second submission while one is in flight.
//!
//! ## Who Writes the Ledger
//!
//! Nobody here. The pipeline's only side effect is the on-chain transfer;
//! the emitted `Payment` event is what the indexer later observes and
//! records.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export main types for convenience
pub use domain::{
    ErroredSubmission, PipelinePhase, SubmitError, SubmitRequest, Submission, TokenKind,
    TransferDraft,
};
pub use ports::{
    AccountDirectory, DirectoryError, GatewayClient, GatewayError, ReceiverProfile,
    WalletConnector, WalletError,
};
pub use service::{Confirmation, PipelineConfig, SubmissionPipeline};
