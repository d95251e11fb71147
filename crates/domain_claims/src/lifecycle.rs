//! Claim lifecycle state machine
//!
//! ```text
//! Pending --decide(approve)--> Approved --payout--> PaidOut
//!    \
//!     `----decide(deny)-----> Denied
//! ```
//!
//! `transition` is the only place the legal moves are written down. Every
//! mutation below, and the in-process ledger, goes through it.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AccountAddress, Amount};
use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::payout::FraudScore;

/// Operations that move a claim between statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimOperation {
    /// Review or override decision
    Decide { approved: bool },
    /// Funds disbursement
    Payout,
}

impl ClaimOperation {
    /// Every operation, for exhaustive checks
    pub const ALL: [ClaimOperation; 3] = [
        ClaimOperation::Decide { approved: true },
        ClaimOperation::Decide { approved: false },
        ClaimOperation::Payout,
    ];
}

impl fmt::Display for ClaimOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimOperation::Decide { approved: true } => f.write_str("approve"),
            ClaimOperation::Decide { approved: false } => f.write_str("deny"),
            ClaimOperation::Payout => f.write_str("pay out"),
        }
    }
}

/// Transition table
///
/// Returns the status reached by applying `operation` in `from`, or `None`
/// when the move is not legal.
pub fn transition(from: ClaimStatus, operation: ClaimOperation) -> Option<ClaimStatus> {
    use ClaimStatus::*;
    match (from, operation) {
        (Pending, ClaimOperation::Decide { approved: true }) => Some(Approved),
        (Pending, ClaimOperation::Decide { approved: false }) => Some(Denied),
        (Approved, ClaimOperation::Payout) => Some(PaidOut),
        _ => None,
    }
}

/// Like [`transition`] but reports an illegal move as an error
pub fn require_transition(
    from: ClaimStatus,
    operation: ClaimOperation,
) -> Result<ClaimStatus, ClaimError> {
    transition(from, operation).ok_or(ClaimError::InvalidTransition { from, operation })
}

/// Lifecycle operations over a [`Claim`]
pub struct ClaimLifecycle;

impl ClaimLifecycle {
    /// Records a review decision on a pending claim
    ///
    /// # Arguments
    ///
    /// * `claim` - The claim to decide; must be Pending
    /// * `approved` - Approve or deny
    /// * `amount` - Granted amount; must be zero when denying and may not
    ///   exceed the requested amount
    /// * `reviewer` - Acting identity, recorded on the claim
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when the claim is not Pending, `InvalidAmount`
    /// for an amount that does not fit the decision. The claim is left
    /// untouched on error.
    pub fn decide(
        claim: &mut Claim,
        approved: bool,
        amount: Amount,
        reviewer: &AccountAddress,
    ) -> Result<(), ClaimError> {
        let next = require_transition(claim.status, ClaimOperation::Decide { approved })?;
        Self::check_decision_amount(claim, approved, amount)?;

        claim.status = next;
        claim.approved_amount = if approved { amount } else { Amount::ZERO };
        claim.reviewer = Some(reviewer.clone());
        Ok(())
    }

    /// Records a scored review: approves when `approved_amount` is non-zero
    pub fn review(
        claim: &mut Claim,
        score: FraudScore,
        approved_amount: Amount,
        reviewer: &AccountAddress,
    ) -> Result<(), ClaimError> {
        Self::decide(claim, !approved_amount.is_zero(), approved_amount, reviewer)?;
        claim.fraud_score = score;
        Ok(())
    }

    /// Marks an approved claim as paid out
    ///
    /// A second payout fails; the ledger never treats it as a no-op.
    pub fn payout(claim: &mut Claim) -> Result<(), ClaimError> {
        claim.status = require_transition(claim.status, ClaimOperation::Payout)?;
        Ok(())
    }

    /// Returns true when no review decision can be recorded any more
    pub fn is_terminal_for_review(status: ClaimStatus) -> bool {
        !matches!(status, ClaimStatus::Pending)
    }

    /// Validates an amount against a decision without mutating anything
    pub fn check_decision_amount(
        claim: &Claim,
        approved: bool,
        amount: Amount,
    ) -> Result<(), ClaimError> {
        if !approved && !amount.is_zero() {
            return Err(ClaimError::invalid_amount(format!(
                "a denial must carry a zero amount, got {}",
                amount
            )));
        }
        if amount > claim.requested_amount {
            return Err(ClaimError::invalid_amount(format!(
                "approved amount {} exceeds requested amount {}",
                amount, claim.requested_amount
            )));
        }
        Ok(())
    }
}
