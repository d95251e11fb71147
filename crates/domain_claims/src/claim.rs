//! Claim entity mirrored from the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AccountAddress, Amount, ClaimId};
use crate::error::ClaimError;
use crate::payout::FraudScore;

/// Claim status
///
/// The discriminants match the ledger's numeric encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Submitted, awaiting review
    Pending,
    /// Approved for payment
    Approved,
    /// Denied
    Denied,
    /// Paid out
    PaidOut,
}

impl ClaimStatus {
    /// All statuses in ledger order
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Pending,
        ClaimStatus::Approved,
        ClaimStatus::Denied,
        ClaimStatus::PaidOut,
    ];

    /// Numeric code used by the ledger
    pub fn code(&self) -> u8 {
        match self {
            ClaimStatus::Pending => 0,
            ClaimStatus::Approved => 1,
            ClaimStatus::Denied => 2,
            ClaimStatus::PaidOut => 3,
        }
    }

    /// Decodes the ledger's numeric status
    pub fn from_code(code: u8) -> Result<Self, ClaimError> {
        match code {
            0 => Ok(ClaimStatus::Pending),
            1 => Ok(ClaimStatus::Approved),
            2 => Ok(ClaimStatus::Denied),
            3 => Ok(ClaimStatus::PaidOut),
            other => Err(ClaimError::UnknownStatusCode(other)),
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Denied => "Denied",
            ClaimStatus::PaidOut => "PaidOut",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for ClaimStatus {
    type Error = ClaimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

/// A policyholder's claim as recorded by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Ledger-assigned identifier
    pub id: ClaimId,
    /// Submitter
    pub policyholder: AccountAddress,
    /// Amount requested at submission
    pub requested_amount: Amount,
    /// Amount granted by the review decision; zero until decided
    pub approved_amount: Amount,
    /// Fraud score; zero until scored
    pub fraud_score: FraudScore,
    /// Status
    pub status: ClaimStatus,
    /// Submission time, seconds since the epoch
    pub timestamp: u64,
    /// Handle to off-ledger supporting documents
    pub document_reference: Option<String>,
    /// Identity that recorded the review decision
    pub reviewer: Option<AccountAddress>,
}

impl Claim {
    /// Creates a freshly submitted claim
    pub fn submitted(
        id: ClaimId,
        policyholder: AccountAddress,
        requested_amount: Amount,
        document_reference: Option<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            policyholder,
            requested_amount,
            approved_amount: Amount::ZERO,
            fraud_score: FraudScore::UNSCORED,
            status: ClaimStatus::Pending,
            timestamp,
            document_reference,
            reviewer: None,
        }
    }

    /// Submission time as a UTC datetime
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Returns true once a review decision has been recorded
    pub fn is_decided(&self) -> bool {
        self.status != ClaimStatus::Pending
    }

    /// Checks the entity invariants
    ///
    /// A non-zero approved amount requires Approved or PaidOut, a pending
    /// claim carries no score or reviewer, and the approved amount never
    /// exceeds the request.
    pub fn is_consistent(&self) -> bool {
        let amount_ok = self.approved_amount.is_zero()
            || matches!(self.status, ClaimStatus::Approved | ClaimStatus::PaidOut);
        let pending_ok = self.status != ClaimStatus::Pending
            || (!self.fraud_score.is_scored() && self.reviewer.is_none());
        amount_ok && pending_ok && self.approved_amount <= self.requested_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder() -> AccountAddress {
        AccountAddress::new("0x1111111111111111111111111111111111111111").unwrap()
    }

    #[test]
    fn test_submitted_claim_is_pending() {
        let claim = Claim::submitted(ClaimId::new(0), holder(), Amount::from_units(1000), None, 1_700_000_000);
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert!(claim.approved_amount.is_zero());
        assert!(!claim.fraud_score.is_scored());
        assert!(claim.reviewer.is_none());
        assert!(claim.is_consistent());
        assert!(!claim.is_decided());
    }

    #[test]
    fn test_submitted_at() {
        let claim = Claim::submitted(ClaimId::new(0), holder(), Amount::from_units(1), None, 86_400);
        assert_eq!(claim.submitted_at().unwrap().to_rfc3339(), "1970-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_status_codes() {
        for status in ClaimStatus::ALL {
            assert_eq!(ClaimStatus::from_code(status.code()).unwrap(), status);
        }
        assert!(matches!(ClaimStatus::from_code(4), Err(ClaimError::UnknownStatusCode(4))));
    }

    #[test]
    fn test_inconsistent_when_pending_has_amount() {
        let mut claim = Claim::submitted(ClaimId::new(0), holder(), Amount::from_units(10), None, 0);
        claim.approved_amount = Amount::from_units(5);
        assert!(!claim.is_consistent());
    }
}
