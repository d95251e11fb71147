//! Test Data Builders
//!
//! Provides builder patterns for constructing claims in any lifecycle state
//! without replaying ledger writes.

use core_kernel::{AccountAddress, Amount, ClaimId};
use domain_claims::{Claim, ClaimStatus, FraudScore};

use crate::fixtures::{AddressFixtures, AmountFixtures, DocumentFixtures, TemporalFixtures};

/// Builder for constructing test claims
pub struct ClaimBuilder {
    id: ClaimId,
    policyholder: AccountAddress,
    requested_amount: Amount,
    approved_amount: Amount,
    fraud_score: FraudScore,
    status: ClaimStatus,
    timestamp: u64,
    document_reference: Option<String>,
    reviewer: Option<AccountAddress>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a builder for a pending claim with default values
    pub fn new() -> Self {
        Self {
            id: ClaimId::new(0),
            policyholder: AddressFixtures::alice(),
            requested_amount: AmountFixtures::claim_request(),
            approved_amount: Amount::ZERO,
            fraud_score: FraudScore::UNSCORED,
            status: ClaimStatus::Pending,
            timestamp: TemporalFixtures::genesis_unix() as u64,
            document_reference: Some(DocumentFixtures::evidence()),
            reviewer: None,
        }
    }

    /// Sets the claim ID
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = ClaimId::new(id);
        self
    }

    /// Sets the policyholder
    pub fn with_policyholder(mut self, policyholder: AccountAddress) -> Self {
        self.policyholder = policyholder;
        self
    }

    /// Sets the requested amount
    pub fn with_requested(mut self, units: u128) -> Self {
        self.requested_amount = Amount::from_units(units);
        self
    }

    /// Sets the submission time in unix seconds
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Marks the claim approved for `units` by the fixture admin
    pub fn approved(mut self, units: u128) -> Self {
        self.status = ClaimStatus::Approved;
        self.approved_amount = Amount::from_units(units);
        self.reviewer = Some(AddressFixtures::admin());
        self
    }

    /// Marks the claim denied by the fixture admin
    pub fn denied(mut self) -> Self {
        self.status = ClaimStatus::Denied;
        self.approved_amount = Amount::ZERO;
        self.reviewer = Some(AddressFixtures::admin());
        self
    }

    /// Marks the claim paid out for `units`
    pub fn paid_out(self, units: u128) -> Self {
        let mut builder = self.approved(units);
        builder.status = ClaimStatus::PaidOut;
        builder
    }

    /// Records a fraud score
    pub fn with_score(mut self, score: u16) -> Self {
        self.fraud_score = FraudScore::new(score).expect("score within 0..=100");
        self
    }

    /// Drops the document reference
    pub fn without_document(mut self) -> Self {
        self.document_reference = None;
        self
    }

    /// Builds the claim
    pub fn build(self) -> Claim {
        Claim {
            id: self.id,
            policyholder: self.policyholder,
            requested_amount: self.requested_amount,
            approved_amount: self.approved_amount,
            fraud_score: self.fraud_score,
            status: self.status,
            timestamp: self.timestamp,
            document_reference: self.document_reference,
            reviewer: self.reviewer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder_is_pending() {
        let claim = ClaimBuilder::new().build();
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert!(claim.approved_amount.is_zero());
        assert!(claim.is_consistent());
    }

    #[test]
    fn test_paid_out_builder() {
        let claim = ClaimBuilder::new().with_requested(500).paid_out(400).build();
        assert_eq!(claim.status, ClaimStatus::PaidOut);
        assert_eq!(claim.approved_amount.units(), 400);
        assert!(claim.reviewer.is_some());
    }
}
