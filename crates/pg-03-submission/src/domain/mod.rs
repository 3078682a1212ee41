//! Domain layer: the submission state machine and its error taxonomy.

pub mod errors;
pub mod typestate;

pub use errors::SubmitError;
pub use typestate::{
    AwaitingConfirmation, AwaitingWalletApproval, Broadcasting, Confirmed, ErroredSubmission,
    Idle, NonTerminalState, PipelinePhase, SubmitRequest, Submission, TokenKind, TransferDraft,
    Validating,
};
