//! The investment process state machine.
//!
//! One process per form session: `Inactive → Security → Processing →
//! Confirmation | Failed → Inactive`. Each phase carries only the data
//! valid in it, and every transition is an explicit method. Transition
//! methods called in the wrong phase return [`PhaseError`] instead of
//! mutating anything, which is how replies that resolve after a
//! cancellation get discarded: once the process is back in `Inactive`,
//! nothing a stale reply triggers can change state.

use std::fmt;

use rust_decimal::Decimal;

use crate::model::{
    CommitOrder, CustomerId, DepositQuote, FundingAccount, InvestmentReceipt, QuestionId,
};

/// Rejected answers allowed before the attempt is forcibly cancelled.
pub const MAX_ANSWER_ATTEMPTS: u8 = 3;

/// A security question issued for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityChallenge {
    pub question_id: QuestionId,
    pub question: String,
}

#[derive(Debug)]
pub enum Phase {
    Inactive,
    Security {
        order: CommitOrder,
        /// `None` while the question fetch is still in flight.
        challenge: Option<SecurityChallenge>,
        attempts_used: u8,
    },
    Processing {
        order: CommitOrder,
    },
    Confirmation(InvestmentReceipt),
    Failed {
        message: String,
    },
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Inactive => "inactive",
            Phase::Security { .. } => "security",
            Phase::Processing { .. } => "processing",
            Phase::Confirmation(_) => "confirmation",
            Phase::Failed { .. } => "failed",
        }
    }
}

/// Why a start request was refused. Starting is a no-op in these cases;
/// the message is surfaced inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartBlocked {
    AlreadyActive,
    NoQuote,
    NoFundingAccount,
}

impl fmt::Display for StartBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartBlocked::AlreadyActive => {
                write!(f, "An investment is already in progress")
            }
            StartBlocked::NoQuote => write!(f, "Calculate the deposit first"),
            StartBlocked::NoFundingAccount => {
                write!(f, "Select an account to debit first")
            }
        }
    }
}

impl std::error::Error for StartBlocked {}

/// A transition method was called in a phase it does not apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseError {
    pub expected: &'static str,
    pub actual: &'static str,
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transition requires the {} phase but the process is {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for PhaseError {}

/// Result of a rejected security answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Stay in the security phase; `remaining` attempts are left.
    Retry { remaining: u8 },
    /// Third consecutive rejection: the process has been cancelled.
    Exhausted,
}

#[derive(Debug, Default)]
pub struct InvestmentProcess {
    phase: Phase,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Inactive
    }
}

impl InvestmentProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// A process is active between start and the terminal transition back
    /// to inactive; the confirmation/failure views still belong to it.
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Inactive)
    }

    /// Start the process: assemble the commit payload and enter the
    /// security phase. The challenge itself arrives asynchronously via
    /// [`InvestmentProcess::challenge_loaded`].
    pub fn start(
        &mut self,
        customer: &CustomerId,
        quote: Option<&DepositQuote>,
        funding: Option<&FundingAccount>,
        term_days: u32,
        rate: Decimal,
    ) -> Result<(), StartBlocked> {
        if self.is_active() {
            return Err(StartBlocked::AlreadyActive);
        }
        let quote = quote.ok_or(StartBlocked::NoQuote)?;
        let funding = funding.ok_or(StartBlocked::NoFundingAccount)?;

        let order = CommitOrder {
            customer: customer.clone(),
            frequency: quote.frequency.clone(),
            amount: quote.principal,
            term_days,
            rate,
            funding_account: funding.code.clone(),
        };
        tracing::info!(amount = %order.amount, term_days, "investment process started");
        self.phase = Phase::Security {
            order,
            challenge: None,
            attempts_used: 0,
        };
        Ok(())
    }

    pub fn challenge(&self) -> Option<&SecurityChallenge> {
        match &self.phase {
            Phase::Security { challenge, .. } => challenge.as_ref(),
            _ => None,
        }
    }

    pub fn attempts_remaining(&self) -> Option<u8> {
        match &self.phase {
            Phase::Security { attempts_used, .. } => {
                Some(MAX_ANSWER_ATTEMPTS.saturating_sub(*attempts_used))
            }
            _ => None,
        }
    }

    pub fn challenge_loaded(&mut self, loaded: SecurityChallenge) -> Result<(), PhaseError> {
        match &mut self.phase {
            Phase::Security { challenge, .. } => {
                *challenge = Some(loaded);
                Ok(())
            }
            other => Err(PhaseError {
                expected: "security",
                actual: other.name(),
            }),
        }
    }

    /// The question fetch failed: the transition into security is aborted
    /// and the user must restart from "start investment".
    pub fn challenge_failed(&mut self) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Security { .. } => {
                self.phase = Phase::Inactive;
                Ok(())
            }
            ref other => Err(PhaseError {
                expected: "security",
                actual: other.name(),
            }),
        }
    }

    /// The remote validation accepted the answer. The challenge is
    /// discarded and the commit order handed back for the (single)
    /// commit request.
    pub fn answer_accepted(&mut self) -> Result<CommitOrder, PhaseError> {
        match &self.phase {
            Phase::Security { order, .. } => {
                let order = order.clone();
                self.phase = Phase::Processing {
                    order: order.clone(),
                };
                Ok(order)
            }
            other => Err(PhaseError {
                expected: "security",
                actual: other.name(),
            }),
        }
    }

    /// The remote validation rejected the answer. Up to
    /// [`MAX_ANSWER_ATTEMPTS`] rejections keep the process in the
    /// security phase; the final one cancels it outright. No commit is
    /// ever issued on this path.
    pub fn answer_rejected(&mut self) -> Result<AnswerOutcome, PhaseError> {
        match &mut self.phase {
            Phase::Security { attempts_used, .. } => {
                *attempts_used += 1;
                if *attempts_used >= MAX_ANSWER_ATTEMPTS {
                    tracing::warn!("security attempts exhausted, cancelling process");
                    self.phase = Phase::Inactive;
                    Ok(AnswerOutcome::Exhausted)
                } else {
                    Ok(AnswerOutcome::Retry {
                        remaining: MAX_ANSWER_ATTEMPTS - *attempts_used,
                    })
                }
            }
            other => Err(PhaseError {
                expected: "security",
                actual: other.name(),
            }),
        }
    }

    /// Explicit user cancellation during the security phase. Never
    /// submits anything.
    pub fn cancel(&mut self) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Security { .. } => {
                tracing::info!("investment process cancelled");
                self.phase = Phase::Inactive;
                Ok(())
            }
            ref other => Err(PhaseError {
                expected: "security",
                actual: other.name(),
            }),
        }
    }

    pub fn commit_succeeded(&mut self, receipt: InvestmentReceipt) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Processing { .. } => {
                tracing::info!(code = %receipt.investment_code, "investment committed");
                self.phase = Phase::Confirmation(receipt);
                Ok(())
            }
            ref other => Err(PhaseError {
                expected: "processing",
                actual: other.name(),
            }),
        }
    }

    /// A failed commit is terminal for this attempt; it is never retried.
    pub fn commit_failed(&mut self, message: impl Into<String>) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Processing { .. } => {
                let message = message.into();
                tracing::warn!(%message, "investment commit failed");
                self.phase = Phase::Failed { message };
                Ok(())
            }
            ref other => Err(PhaseError {
                expected: "processing",
                actual: other.name(),
            }),
        }
    }

    /// Dismiss the confirmation or failure view. The caller is expected
    /// to reset the calculator and clear the funding selection in the
    /// same breath; the workflow never retains a simulation across a
    /// finished commit.
    pub fn dismiss(&mut self) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Confirmation(_) | Phase::Failed { .. } => {
                self.phase = Phase::Inactive;
                Ok(())
            }
            ref other => Err(PhaseError {
                expected: "confirmation or failed",
                actual: other.name(),
            }),
        }
    }
}
