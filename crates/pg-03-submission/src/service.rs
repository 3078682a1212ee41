//! # Submission Service
//!
//! Drives one submission attempt through the state machine, in order:
//! resolve the receiver, run the pre-flight checks, prompt the wallet,
//! broadcast, and wait out confirmation.

use crate::domain::typestate::NonTerminalState;
use crate::domain::{PipelinePhase, SubmitError, SubmitRequest, Submission, TokenKind};
use crate::ports::{AccountDirectory, GatewayClient, WalletConnector};
use parking_lot::Mutex;
use shared_types::{parse_native_amount, Address, TxHash, U256};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The single supported network.
    pub expected_chain_id: u64,
    /// Bound on the wait for inclusion.
    pub confirmation_timeout: Duration,
}

impl PipelineConfig {
    /// Config with the default confirmation bound.
    #[must_use]
    pub fn new(expected_chain_id: u64) -> Self {
        Self {
            expected_chain_id,
            confirmation_timeout: Duration::from_secs(60),
        }
    }
}

/// Successful outcome of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    /// Attempt correlation id.
    pub attempt_id: Uuid,
    /// Identity of the mined transaction.
    pub tx_hash: TxHash,
}

/// The submission pipeline, single-flight per instance.
///
/// One instance corresponds to one user session. A second `submit` while an
/// attempt is between validation and confirmation is rejected by the
/// pipeline itself, independent of any UI-side disabling.
pub struct SubmissionPipeline<W, G, D> {
    wallet: Arc<W>,
    gateway: Arc<G>,
    directory: Arc<D>,
    config: PipelineConfig,
    phase: Mutex<PipelinePhase>,
}

impl<W, G, D> SubmissionPipeline<W, G, D>
where
    W: WalletConnector,
    G: GatewayClient,
    D: AccountDirectory,
{
    /// Create a pipeline over its three collaborators.
    pub fn new(wallet: Arc<W>, gateway: Arc<G>, directory: Arc<D>, config: PipelineConfig) -> Self {
        Self {
            wallet,
            gateway,
            directory,
            config,
            phase: Mutex::new(PipelinePhase::Idle),
        }
    }

    /// Current observable phase.
    #[must_use]
    pub fn phase(&self) -> PipelinePhase {
        *self.phase.lock()
    }

    /// Run one submission attempt to completion.
    ///
    /// Never retries past validation on its own: every error is surfaced
    /// with its specific cause and a retry is a fresh call by the user.
    pub async fn submit(&self, request: SubmitRequest) -> Result<Confirmation, SubmitError> {
        {
            let mut phase = self.phase.lock();
            match *phase {
                PipelinePhase::Idle | PipelinePhase::Errored => {
                    *phase = PipelinePhase::Validating;
                }
                _ => return Err(SubmitError::SubmissionInFlight),
            }
        }

        let submission = Submission::new(request).begin();
        debug!(attempt = %submission.attempt_id(), slug = %submission.request().slug, "Submission started");

        // Populate the receiver before validating it.
        let receiver_input = match submission.request().receiver.clone() {
            Some(input) => input,
            None => {
                let slug = submission.request().slug.clone();
                match self.directory.resolve_slug(&slug).await {
                    Ok(Some(profile)) => profile.address.to_string(),
                    Ok(None) | Err(_) => {
                        return Err(self.bail(submission, SubmitError::UnknownSlug { slug }))
                    }
                }
            }
        };

        // Check 1: a funding connection must exist before anything else can
        // be asked of it.
        if !self.wallet.is_connected().await {
            return Err(self.bail(submission, SubmitError::WalletUnavailable));
        }

        // Check 2: the wallet must be on the supported network.
        let actual = match self.wallet.chain_id().await {
            Ok(id) => id,
            Err(_) => return Err(self.bail(submission, SubmitError::WalletUnavailable)),
        };
        if actual != self.config.expected_chain_id {
            return Err(self.bail(
                submission,
                SubmitError::WrongNetwork {
                    expected: self.config.expected_chain_id,
                    actual,
                },
            ));
        }

        // Check 3: the receiver must be a well-formed address.
        let receiver = match receiver_input.parse::<Address>() {
            Ok(address) => address,
            Err(_) => {
                return Err(self.bail(
                    submission,
                    SubmitError::InvalidReceiver {
                        input: receiver_input,
                    },
                ))
            }
        };

        // Check 4: the amount must be a strictly positive decimal.
        let amount = match parse_native_amount(&submission.request().amount) {
            Ok(value) if value > U256::zero() => value,
            Ok(_) => {
                return Err(self.bail(
                    submission,
                    SubmitError::InvalidAmount {
                        reason: "amount must be positive".to_string(),
                    },
                ))
            }
            Err(e) => {
                return Err(self.bail(
                    submission,
                    SubmitError::InvalidAmount {
                        reason: e.to_string(),
                    },
                ))
            }
        };

        // Check 5: the receiver must be externally owned. A failed lookup
        // counts as no code, matching wallet behavior for fresh accounts.
        let code = self
            .wallet
            .code_at(receiver)
            .await
            .unwrap_or_default();
        if !code.is_empty() {
            return Err(self.bail(submission, SubmitError::ContractReceiver { receiver }));
        }

        if submission.request().token == TokenKind::Erc20 {
            return Err(self.bail(submission, SubmitError::UnsupportedToken));
        }

        let submission = submission.validated(receiver, amount);
        self.set_phase(PipelinePhase::AwaitingWalletApproval);

        let draft = submission.draft();
        if let Err(e) = self.wallet.approve_transfer(&draft).await {
            return Err(self.bail(
                submission,
                SubmitError::WalletRejected { reason: e.message },
            ));
        }

        let submission = submission.approved();
        self.set_phase(PipelinePhase::Broadcasting);

        let tx_hash = match self.gateway.pay_native(&submission.draft()).await {
            Ok(hash) => hash,
            Err(e) => {
                return Err(self.bail(
                    submission,
                    SubmitError::BroadcastFailed { reason: e.message },
                ))
            }
        };

        let submission = submission.broadcast(tx_hash);
        self.set_phase(PipelinePhase::AwaitingConfirmation);

        match timeout(
            self.config.confirmation_timeout,
            self.gateway.await_confirmation(tx_hash),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(self.bail(
                    submission,
                    SubmitError::ConfirmationFailed { reason: e.message },
                ))
            }
            Err(_) => {
                let timeout_secs = self.config.confirmation_timeout.as_secs();
                return Err(self.bail(
                    submission,
                    SubmitError::ConfirmationTimeout { timeout_secs },
                ));
            }
        }

        let confirmed = submission.confirmed();
        self.set_phase(PipelinePhase::Idle);
        info!(
            attempt = %confirmed.attempt_id(),
            tx = %confirmed.tx_hash(),
            slug = %confirmed.request().slug,
            "Payment confirmed on-chain"
        );

        Ok(Confirmation {
            attempt_id: confirmed.attempt_id(),
            tx_hash: confirmed.tx_hash(),
        })
    }

    fn set_phase(&self, phase: PipelinePhase) {
        *self.phase.lock() = phase;
    }

    /// Fail the attempt, record the phase, surface the cause.
    fn bail<S: NonTerminalState>(
        &self,
        submission: Submission<S>,
        cause: SubmitError,
    ) -> SubmitError {
        self.set_phase(PipelinePhase::Errored);
        let errored = submission.fail(cause);
        warn!(
            attempt = %errored.attempt_id(),
            from = ?errored.failed_from(),
            error = %errored.cause(),
            "Submission failed"
        );
        errored.into_cause()
    }
}
