//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for claims that give more
//! meaningful failure messages than standard assertions.

use core_kernel::Amount;
use domain_claims::{Claim, ClaimEvent, ClaimStatus};

/// Asserts that a claim has a given status
pub fn assert_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} has status {}, expected {}",
        claim.id, claim.status, expected
    );
}

/// Asserts that the approved amount matches the claim's status
///
/// # Panics
///
/// Panics if a pending or denied claim carries an approved amount, or if
/// the approved amount exceeds the request.
pub fn assert_claim_consistent(claim: &Claim) {
    assert!(
        claim.is_consistent(),
        "Claim {} is inconsistent: status={}, requested={}, approved={}",
        claim.id,
        claim.status,
        claim.requested_amount,
        claim.approved_amount
    );
}

/// Asserts that an amount lies in `[0, ceiling]`
pub fn assert_amount_within(amount: Amount, ceiling: Amount) {
    assert!(
        amount <= ceiling,
        "Amount {} exceeds ceiling {}",
        amount,
        ceiling
    );
}

/// Asserts that claims are ordered newest first
pub fn assert_newest_first(claims: &[Claim]) {
    for pair in claims.windows(2) {
        assert!(
            (pair[0].timestamp, pair[0].id) >= (pair[1].timestamp, pair[1].id),
            "Claims out of order: {} at {} before {} at {}",
            pair[0].id,
            pair[0].timestamp,
            pair[1].id,
            pair[1].timestamp
        );
    }
}

/// Asserts the exact sequence of event types in a log
pub fn assert_event_types(events: &[ClaimEvent], expected: &[&str]) {
    let actual: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
    assert_eq!(actual, expected, "Unexpected event sequence");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ClaimBuilder;

    #[test]
    fn test_newest_first_accepts_sorted() {
        let claims = vec![
            ClaimBuilder::new().with_id(2).with_timestamp(20).build(),
            ClaimBuilder::new().with_id(1).with_timestamp(20).build(),
            ClaimBuilder::new().with_id(0).with_timestamp(10).build(),
        ];
        assert_newest_first(&claims);
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn test_newest_first_rejects_unsorted() {
        let claims = vec![
            ClaimBuilder::new().with_id(0).with_timestamp(10).build(),
            ClaimBuilder::new().with_id(1).with_timestamp(20).build(),
        ];
        assert_newest_first(&claims);
    }

    #[test]
    #[should_panic(expected = "inconsistent")]
    fn test_inconsistent_claim_detected() {
        let mut claim = ClaimBuilder::new().build();
        claim.approved_amount = Amount::from_units(1);
        assert_claim_consistent(&claim);
    }
}
