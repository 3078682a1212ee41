//! # Type-State Submission Machine
//!
//! Compile-time enforcement of the submission flow. Each state is a distinct
//! type and every transition consumes `self`, so a submission cannot skip
//! validation, be broadcast twice, or leave `Confirmed`.
//!
//! ```ignore
//! let draft = Submission::new(request);                  // Idle
//! let validating = draft.begin();                        // Validating
//! let approved = validating.validated(receiver, amount); // AwaitingWalletApproval
//! let broadcasting = approved.approved();                // Broadcasting
//! let waiting = broadcasting.broadcast(tx_hash);         // AwaitingConfirmation
//! let done = waiting.confirmed();                        // Confirmed (terminal)
//! // waiting.confirmed();  // COMPILE ERROR: value already consumed
//! ```
//!
//! Every non-terminal state can `fail(cause)` into an [`ErroredSubmission`];
//! `Confirmed` has no such method.

use crate::domain::errors::SubmitError;
use shared_types::{Address, TxHash, U256};
use std::marker::PhantomData;
use uuid::Uuid;

/// Asset selection for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// The chain's native asset; the only supported kind.
    Native,
    /// An ERC-20-style token. Reported as unsupported, never attempted.
    Erc20,
}

/// User-supplied inputs for one submission attempt.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Payment link being paid through.
    pub slug: String,
    /// Receiver address as entered; `None` to resolve from the slug.
    pub receiver: Option<String>,
    /// Display-unit amount as entered, e.g. `"1.5"`.
    pub amount: String,
    /// Optional payer note.
    pub memo: String,
    /// Asset selection.
    pub token: TokenKind,
}

/// Validated transfer parameters handed to the wallet and the gateway.
#[derive(Debug, Clone)]
pub struct TransferDraft {
    /// Attempt correlation id.
    pub attempt_id: Uuid,
    /// Validated receiver.
    pub receiver: Address,
    /// Amount in smallest units.
    pub amount: U256,
    /// Payment link.
    pub slug: String,
    /// Payer note.
    pub memo: String,
}

/// Observable phase of the pipeline, for single-flight gating and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    Validating,
    AwaitingWalletApproval,
    Broadcasting,
    AwaitingConfirmation,
    Confirmed,
    Errored,
}

// =============================================================================
// STATE MARKERS (Zero-Sized Types)
// =============================================================================

/// Marker: no attempt in progress.
#[derive(Debug, Clone, Copy)]
pub struct Idle;

/// Marker: pre-flight checks running.
#[derive(Debug, Clone, Copy)]
pub struct Validating;

/// Marker: waiting for the user to confirm in the wallet.
#[derive(Debug, Clone, Copy)]
pub struct AwaitingWalletApproval;

/// Marker: transaction being submitted to the network.
#[derive(Debug, Clone, Copy)]
pub struct Broadcasting;

/// Marker: polling for inclusion.
#[derive(Debug, Clone, Copy)]
pub struct AwaitingConfirmation;

/// Marker: the network reported the transaction mined. Terminal.
#[derive(Debug, Clone, Copy)]
pub struct Confirmed;

/// States from which a submission can still fail.
///
/// Deliberately not implemented for [`Confirmed`]: a mined transfer cannot
/// be un-happened by the client.
pub trait NonTerminalState {
    /// Phase reported when failing from this state.
    const PHASE: PipelinePhase;
}

impl NonTerminalState for Idle {
    const PHASE: PipelinePhase = PipelinePhase::Idle;
}
impl NonTerminalState for Validating {
    const PHASE: PipelinePhase = PipelinePhase::Validating;
}
impl NonTerminalState for AwaitingWalletApproval {
    const PHASE: PipelinePhase = PipelinePhase::AwaitingWalletApproval;
}
impl NonTerminalState for Broadcasting {
    const PHASE: PipelinePhase = PipelinePhase::Broadcasting;
}
impl NonTerminalState for AwaitingConfirmation {
    const PHASE: PipelinePhase = PipelinePhase::AwaitingConfirmation;
}

// =============================================================================
// TYPE-STATE SUBMISSION
// =============================================================================

/// One in-flight transfer attempt with compile-time enforced state.
///
/// Ephemeral by design: never persisted, discarded on completion or
/// abandonment.
#[derive(Debug)]
pub struct Submission<S> {
    /// Attempt correlation id.
    attempt_id: Uuid,
    /// The inputs as submitted.
    request: SubmitRequest,
    /// State-specific data (private).
    state_data: StateData,
    /// Phantom data holding the state type.
    _state: PhantomData<S>,
}

/// State-specific data stored internally.
#[derive(Debug, Clone)]
enum StateData {
    Draft,
    Validated {
        receiver: Address,
        amount: U256,
    },
    Broadcast {
        receiver: Address,
        amount: U256,
        tx_hash: TxHash,
    },
}

impl<S> Submission<S> {
    /// Attempt correlation id.
    #[must_use]
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    /// The inputs as submitted.
    #[must_use]
    pub fn request(&self) -> &SubmitRequest {
        &self.request
    }
}

impl<S: NonTerminalState> Submission<S> {
    /// Fail from any non-terminal state.
    ///
    /// This CONSUMES the submission; only the errored view remains.
    #[must_use = "The errored submission carries the cause"]
    pub fn fail(self, cause: SubmitError) -> ErroredSubmission {
        ErroredSubmission {
            attempt_id: self.attempt_id,
            request: self.request,
            failed_from: S::PHASE,
            cause,
        }
    }
}

impl Submission<Idle> {
    /// Creates a new idle submission.
    ///
    /// This is the ONLY entry point for creating submissions.
    #[must_use]
    pub fn new(request: SubmitRequest) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            request,
            state_data: StateData::Draft,
            _state: PhantomData,
        }
    }

    /// Start validation. Triggered by a user-initiated submit.
    #[must_use = "The validating submission must be handled"]
    pub fn begin(self) -> Submission<Validating> {
        Submission {
            attempt_id: self.attempt_id,
            request: self.request,
            state_data: StateData::Draft,
            _state: PhantomData,
        }
    }
}

impl Submission<Validating> {
    /// Record that every pre-flight check passed.
    ///
    /// Carries the resolved receiver and the exact smallest-unit amount
    /// forward; nothing downstream re-reads the raw inputs.
    #[must_use = "The approved submission must be handled"]
    pub fn validated(self, receiver: Address, amount: U256) -> Submission<AwaitingWalletApproval> {
        Submission {
            attempt_id: self.attempt_id,
            request: self.request,
            state_data: StateData::Validated { receiver, amount },
            _state: PhantomData,
        }
    }
}

impl Submission<AwaitingWalletApproval> {
    /// The user confirmed in the wallet.
    #[must_use = "The broadcasting submission must be handled"]
    pub fn approved(self) -> Submission<Broadcasting> {
        Submission {
            attempt_id: self.attempt_id,
            request: self.request,
            state_data: self.state_data,
            _state: PhantomData,
        }
    }

    /// Validated transfer parameters for the wallet prompt.
    #[must_use]
    pub fn draft(&self) -> TransferDraft {
        let (receiver, amount) = self.validated_fields();
        TransferDraft {
            attempt_id: self.attempt_id,
            receiver,
            amount,
            slug: self.request.slug.clone(),
            memo: self.request.memo.clone(),
        }
    }

    fn validated_fields(&self) -> (Address, U256) {
        match self.state_data {
            StateData::Validated { receiver, amount } => (receiver, amount),
            _ => unreachable!("state machine guarantees validated data"),
        }
    }
}

impl Submission<Broadcasting> {
    /// The network accepted the transaction.
    ///
    /// There is no way back from here: a broadcast cannot be recalled.
    #[must_use = "The awaiting-confirmation submission must be handled"]
    pub fn broadcast(self, tx_hash: TxHash) -> Submission<AwaitingConfirmation> {
        let (receiver, amount) = match self.state_data {
            StateData::Validated { receiver, amount } => (receiver, amount),
            _ => unreachable!("state machine guarantees validated data"),
        };
        Submission {
            attempt_id: self.attempt_id,
            request: self.request,
            state_data: StateData::Broadcast {
                receiver,
                amount,
                tx_hash,
            },
            _state: PhantomData,
        }
    }

    /// Validated transfer parameters for the gateway call.
    #[must_use]
    pub fn draft(&self) -> TransferDraft {
        let (receiver, amount) = match self.state_data {
            StateData::Validated { receiver, amount } => (receiver, amount),
            _ => unreachable!("state machine guarantees validated data"),
        };
        TransferDraft {
            attempt_id: self.attempt_id,
            receiver,
            amount,
            slug: self.request.slug.clone(),
            memo: self.request.memo.clone(),
        }
    }
}

impl Submission<AwaitingConfirmation> {
    /// The network reported the transaction mined.
    #[must_use = "The confirmed submission carries the transaction identity"]
    pub fn confirmed(self) -> Submission<Confirmed> {
        Submission {
            attempt_id: self.attempt_id,
            request: self.request,
            state_data: self.state_data,
            _state: PhantomData,
        }
    }

    /// Identity of the broadcast transaction.
    #[must_use]
    pub fn tx_hash(&self) -> TxHash {
        match self.state_data {
            StateData::Broadcast { tx_hash, .. } => tx_hash,
            _ => unreachable!("state machine guarantees broadcast data"),
        }
    }
}

impl Submission<Confirmed> {
    /// Identity of the mined transaction.
    #[must_use]
    pub fn tx_hash(&self) -> TxHash {
        match self.state_data {
            StateData::Broadcast { tx_hash, .. } => tx_hash,
            _ => unreachable!("state machine guarantees broadcast data"),
        }
    }
}

/// A failed submission attempt.
///
/// Keeps the original inputs so the user can correct and resubmit; the
/// pipeline itself never retries.
#[derive(Debug)]
pub struct ErroredSubmission {
    attempt_id: Uuid,
    request: SubmitRequest,
    failed_from: PipelinePhase,
    cause: SubmitError,
}

impl ErroredSubmission {
    /// Attempt correlation id.
    #[must_use]
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    /// The inputs as submitted.
    #[must_use]
    pub fn request(&self) -> &SubmitRequest {
        &self.request
    }

    /// Phase the attempt failed from.
    #[must_use]
    pub fn failed_from(&self) -> PipelinePhase {
        self.failed_from
    }

    /// The underlying cause, verbatim.
    #[must_use]
    pub fn cause(&self) -> &SubmitError {
        &self.cause
    }

    /// Consume the errored view, yielding the cause.
    #[must_use]
    pub fn into_cause(self) -> SubmitError {
        self.cause
    }
}

// =============================================================================
// TESTS
// =============================================================================
