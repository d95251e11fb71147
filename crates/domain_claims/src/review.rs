//! Review and override planning
//!
//! Builds the exact arguments of a ledger write from what an administrator
//! entered, and validates them against the mirrored claim before anything
//! is sent.

use serde::{Deserialize, Serialize};

use core_kernel::{AccountAddress, Amount};
use crate::claim::Claim;
use crate::error::ClaimError;
use crate::lifecycle::{require_transition, ClaimLifecycle, ClaimOperation};
use crate::payout::{FraudScore, PayoutCalculator, Threshold};

/// Suggested outcome shown next to the score slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    Approve,
    Deny,
}

impl Suggestion {
    pub fn from_flag(approve: bool) -> Self {
        if approve {
            Suggestion::Approve
        } else {
            Suggestion::Deny
        }
    }
}

/// A scored review ready to send to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPlan {
    pub fraud_score: FraudScore,
    pub threshold: Threshold,
    /// Advisory decision from the threshold
    pub suggestion: Suggestion,
    /// Amount the payout curve yields for this score
    pub derived_amount: Amount,
    /// Amount that will be sent: the administrator's, else the derived one
    pub approved_amount: Amount,
    /// Whether the ledger will record an approval
    pub approves: bool,
}

impl ReviewPlan {
    /// Plans a review of `claim`
    ///
    /// # Arguments
    ///
    /// * `claim` - The mirrored claim; must still be Pending
    /// * `score` - Assigned fraud score
    /// * `threshold` - Current ledger threshold
    /// * `manual_amount` - Amount typed by the administrator, if any
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if the claim was already decided and
    /// `InvalidAmount` if the amount exceeds the request.
    pub fn build(
        claim: &Claim,
        score: FraudScore,
        threshold: Threshold,
        manual_amount: Option<Amount>,
    ) -> Result<Self, ClaimError> {
        let derived_amount = PayoutCalculator::derive_amount(claim.requested_amount, score);
        let approved_amount = manual_amount.unwrap_or(derived_amount);
        let approves = !approved_amount.is_zero();

        require_transition(claim.status, ClaimOperation::Decide { approved: approves })?;
        ClaimLifecycle::check_decision_amount(claim, approves, approved_amount)?;

        Ok(Self {
            fraud_score: score,
            threshold,
            suggestion: Suggestion::from_flag(PayoutCalculator::decide_automatically(score, threshold)),
            derived_amount,
            approved_amount,
            approves,
        })
    }

    /// Applies the plan to a local copy of the claim
    pub fn apply(&self, claim: &mut Claim, reviewer: &AccountAddress) -> Result<(), ClaimError> {
        ClaimLifecycle::review(claim, self.fraud_score, self.approved_amount, reviewer)
    }
}

/// A manual approve/deny that bypasses the fraud score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverridePlan {
    pub approved: bool,
    pub amount: Amount,
}

impl OverridePlan {
    /// Plans an override of `claim`
    ///
    /// Approving without an explicit amount grants the full request;
    /// denying always sends zero.
    pub fn build(claim: &Claim, approved: bool, amount: Option<Amount>) -> Result<Self, ClaimError> {
        let amount = match (approved, amount) {
            (true, Some(amount)) => amount,
            (true, None) => claim.requested_amount,
            (false, amount) => amount.unwrap_or(Amount::ZERO),
        };

        require_transition(claim.status, ClaimOperation::Decide { approved })?;
        ClaimLifecycle::check_decision_amount(claim, approved, amount)?;

        Ok(Self { approved, amount })
    }

    /// Applies the plan to a local copy of the claim
    pub fn apply(&self, claim: &mut Claim, reviewer: &AccountAddress) -> Result<(), ClaimError> {
        ClaimLifecycle::decide(claim, self.approved, self.amount, reviewer)
    }
}

/// A validated claim submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub requested_amount: Amount,
    pub document_reference: String,
}

impl Submission {
    /// Validates a submission
    ///
    /// When no document reference is supplied, a placeholder of the form
    /// `ipfs-<unix millis>-<address chars 2..8>` is generated.
    pub fn new(
        policyholder: &AccountAddress,
        requested_amount: Amount,
        document_reference: Option<String>,
        now_millis: i64,
    ) -> Result<Self, ClaimError> {
        if requested_amount.is_zero() {
            return Err(ClaimError::invalid_amount("requested amount must be greater than zero"));
        }

        let document_reference = match document_reference.map(|d| d.trim().to_string()) {
            Some(reference) if !reference.is_empty() => reference,
            _ => placeholder_reference(policyholder, now_millis),
        };

        Ok(Self {
            requested_amount,
            document_reference,
        })
    }
}

fn placeholder_reference(policyholder: &AccountAddress, now_millis: i64) -> String {
    let fragment: String = policyholder.as_str().chars().skip(2).take(6).collect();
    format!("ipfs-{}-{}", now_millis, fragment)
}
