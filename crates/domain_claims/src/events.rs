//! Events emitted by the ledger
//!
//! The ledger appends one event per confirmed write. The dashboard reads
//! them for the audit view; they are never used to rebuild claim state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountAddress, Amount, ClaimId};
use crate::claim::ClaimStatus;
use crate::payout::{FraudScore, Threshold};

/// Ledger events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaimEvent {
    /// A claim was submitted
    ClaimSubmitted {
        claim_id: ClaimId,
        policyholder: AccountAddress,
        requested_amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// A scored review was recorded
    ClaimVerified {
        claim_id: ClaimId,
        fraud_score: FraudScore,
        approved_amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// A claim changed status
    ClaimStatusUpdated {
        claim_id: ClaimId,
        status: ClaimStatus,
        timestamp: DateTime<Utc>,
    },

    /// Funds were sent to the policyholder
    PayoutExecuted {
        claim_id: ClaimId,
        policyholder: AccountAddress,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// The approval threshold changed
    FraudScoreThresholdUpdated {
        new_threshold: Threshold,
        timestamp: DateTime<Utc>,
    },

    /// The treasury received funds
    FundsDeposited {
        from: AccountAddress,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// The owner withdrew treasury funds
    FundsWithdrawn {
        to: AccountAddress,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// Administrative rights moved to a new owner
    OwnershipTransferred {
        previous_owner: AccountAddress,
        new_owner: AccountAddress,
        timestamp: DateTime<Utc>,
    },
}

impl ClaimEvent {
    /// Returns the claim this event concerns, if any
    pub fn claim_id(&self) -> Option<ClaimId> {
        match self {
            ClaimEvent::ClaimSubmitted { claim_id, .. }
            | ClaimEvent::ClaimVerified { claim_id, .. }
            | ClaimEvent::ClaimStatusUpdated { claim_id, .. }
            | ClaimEvent::PayoutExecuted { claim_id, .. } => Some(*claim_id),
            _ => None,
        }
    }

    /// Returns when the event occurred
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ClaimEvent::ClaimSubmitted { timestamp, .. }
            | ClaimEvent::ClaimVerified { timestamp, .. }
            | ClaimEvent::ClaimStatusUpdated { timestamp, .. }
            | ClaimEvent::PayoutExecuted { timestamp, .. }
            | ClaimEvent::FraudScoreThresholdUpdated { timestamp, .. }
            | ClaimEvent::FundsDeposited { timestamp, .. }
            | ClaimEvent::FundsWithdrawn { timestamp, .. }
            | ClaimEvent::OwnershipTransferred { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ClaimEvent::ClaimSubmitted { .. } => "ClaimSubmitted",
            ClaimEvent::ClaimVerified { .. } => "ClaimVerified",
            ClaimEvent::ClaimStatusUpdated { .. } => "ClaimStatusUpdated",
            ClaimEvent::PayoutExecuted { .. } => "PayoutExecuted",
            ClaimEvent::FraudScoreThresholdUpdated { .. } => "FraudScoreThresholdUpdated",
            ClaimEvent::FundsDeposited { .. } => "FundsDeposited",
            ClaimEvent::FundsWithdrawn { .. } => "FundsWithdrawn",
            ClaimEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}
