//! End-to-end tests of the claims service over the in-memory ledger

use std::sync::Arc;

use chrono::Duration;
use proptest::prelude::*;

use core_kernel::{Amount, ClaimId, PortError};
use domain_claims::{
    ClaimError, ClaimOperation, ClaimStatus, ClaimsLedgerPort, ClaimsService, FraudScore, Suggestion,
    Threshold,
};
use infra_ledger::{FixedClock, InMemoryLedger};
use test_utils::{
    assert_claim_consistent, assert_event_types, assert_newest_first, assert_status,
    fraud_score_strategy, requested_amount_strategy, AddressFixtures, AmountFixtures,
    TemporalFixtures,
};

fn setup() -> (Arc<FixedClock>, Arc<InMemoryLedger>, ClaimsService) {
    let clock = Arc::new(FixedClock::new(TemporalFixtures::genesis()));
    let ledger = Arc::new(
        InMemoryLedger::new(AddressFixtures::admin())
            .with_clock(clock.clone())
            .with_balance(AmountFixtures::funded_treasury()),
    );
    let service = ClaimsService::new(ledger.clone());
    (clock, ledger, service)
}

fn score(value: u16) -> FraudScore {
    FraudScore::new(value).unwrap()
}

// ============================================================================
// Lifecycle Scenarios
// ============================================================================

mod lifecycle_scenarios {
    use super::*;

    #[tokio::test]
    async fn test_low_score_review_then_payout() {
        let (_clock, ledger, service) = setup();
        let admin = AddressFixtures::admin();
        let alice = AddressFixtures::alice();

        let id = service.submit_claim(&alice, Amount::from_units(1000), None).await.unwrap();

        let plan = service.plan_review(id, score(30), None).await.unwrap();
        assert_eq!(plan.suggestion, Suggestion::Approve);
        assert_eq!(plan.derived_amount.units(), 1000);

        let claim = service.review_claim(&admin, id, score(30), None).await.unwrap();
        assert_status(&claim, ClaimStatus::Approved);
        assert_eq!(claim.approved_amount.units(), 1000);

        let claim = service.execute_payout(&admin, id).await.unwrap();
        assert_status(&claim, ClaimStatus::PaidOut);
        assert_claim_consistent(&claim);
        assert_eq!(
            ledger.balance().await.unwrap(),
            AmountFixtures::funded_treasury().checked_sub(Amount::from_units(1000)).unwrap()
        );

        let err = service.execute_payout(&admin, id).await.unwrap_err();
        assert!(matches!(
            err,
            ClaimError::InvalidTransition { from: ClaimStatus::PaidOut, operation: ClaimOperation::Payout }
        ));

        assert_event_types(
            &service.events().await.unwrap(),
            &[
                "ClaimSubmitted",
                "ClaimVerified",
                "ClaimStatusUpdated",
                "PayoutExecuted",
                "ClaimStatusUpdated",
            ],
        );
    }

    #[tokio::test]
    async fn test_override_deny_ignores_score() {
        let (_clock, _ledger, service) = setup();
        let admin = AddressFixtures::admin();
        let id = service
            .submit_claim(&AddressFixtures::alice(), Amount::from_units(1000), None)
            .await
            .unwrap();

        let claim = service.override_claim(&admin, id, false, None).await.unwrap();
        assert_status(&claim, ClaimStatus::Denied);
        assert!(claim.approved_amount.is_zero());

        assert!(service.execute_payout(&admin, id).await.is_err());
        assert!(service.review_claim(&admin, id, score(0), None).await.is_err());
    }

    #[tokio::test]
    async fn test_high_score_review_denies() {
        let (_clock, _ledger, service) = setup();
        let admin = AddressFixtures::admin();
        let id = service
            .submit_claim(&AddressFixtures::alice(), Amount::from_units(1000), None)
            .await
            .unwrap();

        let claim = service.review_claim(&admin, id, score(100), None).await.unwrap();
        assert_status(&claim, ClaimStatus::Denied);
        assert_eq!(claim.fraud_score.value(), 100);
    }

    #[tokio::test]
    async fn test_partial_approval_pays_partial_amount() {
        let (_clock, ledger, service) = setup();
        let admin = AddressFixtures::admin();
        let id = service
            .submit_claim(&AddressFixtures::alice(), Amount::from_units(1000), None)
            .await
            .unwrap();

        let claim = service.review_claim(&admin, id, score(75), None).await.unwrap();
        assert_eq!(claim.approved_amount.units(), 500);

        let before = ledger.balance().await.unwrap();
        service.execute_payout(&admin, id).await.unwrap();
        assert_eq!(before.checked_sub(ledger.balance().await.unwrap()).unwrap().units(), 500);
    }

    #[tokio::test]
    async fn test_second_review_fails() {
        let (_clock, _ledger, service) = setup();
        let admin = AddressFixtures::admin();
        let id = service
            .submit_claim(&AddressFixtures::alice(), Amount::from_units(1000), None)
            .await
            .unwrap();
        service.review_claim(&admin, id, score(20), None).await.unwrap();

        let err = service.review_claim(&admin, id, score(20), None).await.unwrap_err();
        assert!(matches!(err, ClaimError::InvalidTransition { from: ClaimStatus::Approved, .. }));
    }
}

// ============================================================================
// Authorization and Validation
// ============================================================================

mod guard_tests {
    use super::*;

    #[tokio::test]
    async fn test_policyholder_cannot_review() {
        let (_clock, ledger, service) = setup();
        let alice = AddressFixtures::alice();
        let id = service.submit_claim(&alice, Amount::from_units(1000), None).await.unwrap();

        let err = service.override_claim(&alice, id, true, None).await.unwrap_err();
        assert!(matches!(err, ClaimError::Unauthorized(_)));
        assert_eq!(ledger.get_claim(id).await.unwrap().status, ClaimStatus::Pending);
    }

    #[tokio::test]
    async fn test_direct_ledger_call_by_stranger_is_refused() {
        let (_clock, ledger, _service) = setup();
        let err = ledger
            .set_threshold(&AddressFixtures::stranger(), Threshold::new(10).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let (_clock, _ledger, service) = setup();
        let err = service.get_claim(ClaimId::new(5)).await.unwrap_err();
        assert!(matches!(err, ClaimError::NotFound(id) if id == ClaimId::new(5)));
    }

    #[tokio::test]
    async fn test_overlarge_manual_amount_rejected() {
        let (_clock, ledger, service) = setup();
        let admin = AddressFixtures::admin();
        let id = service
            .submit_claim(&AddressFixtures::alice(), Amount::from_units(1000), None)
            .await
            .unwrap();

        let err = service
            .review_claim(&admin, id, score(10), Some(Amount::from_units(1001)))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::InvalidAmount(_)));
        assert_eq!(ledger.events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_payout_with_empty_treasury_fails_and_keeps_status() {
        let ledger = Arc::new(InMemoryLedger::new(AddressFixtures::admin()));
        let service = ClaimsService::new(ledger.clone());
        let admin = AddressFixtures::admin();
        let id = service
            .submit_claim(&AddressFixtures::alice(), Amount::from_units(10), None)
            .await
            .unwrap();
        service.override_claim(&admin, id, true, None).await.unwrap();

        let err = service.execute_payout(&admin, id).await.unwrap_err();
        assert!(matches!(err, ClaimError::ExternalCallFailed(_)));
        assert_eq!(service.get_claim(id).await.unwrap().status, ClaimStatus::Approved);

        service.deposit(&AddressFixtures::bob(), Amount::from_units(10)).await.unwrap();
        let claim = service.execute_payout(&admin, id).await.unwrap();
        assert_status(&claim, ClaimStatus::PaidOut);
        assert!(service.balance().await.unwrap().is_zero());
    }
}

// ============================================================================
// Settings, Treasury, and Ownership
// ============================================================================

mod administration_tests {
    use super::*;

    #[tokio::test]
    async fn test_threshold_changes_suggestion_only() {
        let (_clock, _ledger, service) = setup();
        let admin = AddressFixtures::admin();
        let id = service
            .submit_claim(&AddressFixtures::alice(), Amount::from_units(1000), None)
            .await
            .unwrap();

        assert_eq!(service.plan_review(id, score(60), None).await.unwrap().suggestion, Suggestion::Approve);

        service.set_threshold(&admin, Threshold::new(50).unwrap()).await.unwrap();
        assert_eq!(service.threshold().await.unwrap().value(), 50);

        let plan = service.plan_review(id, score(60), None).await.unwrap();
        assert_eq!(plan.suggestion, Suggestion::Deny);
        assert_eq!(plan.derived_amount.units(), 800);
    }

    #[tokio::test]
    async fn test_withdraw_and_snapshot() {
        let (_clock, _ledger, service) = setup();
        let admin = AddressFixtures::admin();

        service.withdraw(&admin, Amount::from_units(1)).await.unwrap();
        let snapshot = service.snapshot().await;
        assert_eq!(
            snapshot.balance,
            AmountFixtures::funded_treasury().checked_sub(Amount::from_units(1)).unwrap()
        );
        assert_eq!(snapshot.owner, Some(admin));
    }

    #[tokio::test]
    async fn test_ownership_transfer_moves_admin_rights() {
        let (_clock, _ledger, service) = setup();
        let admin = AddressFixtures::admin();
        let bob = AddressFixtures::bob();

        service.transfer_ownership(&admin, bob.clone()).await.unwrap();
        assert!(service.is_admin(&bob).await.unwrap());
        assert!(!service.is_admin(&admin).await.unwrap());

        let err = service.set_threshold(&admin, Threshold::DEFAULT).await.unwrap_err();
        assert!(matches!(err, ClaimError::Unauthorized(_)));
    }
}

// ============================================================================
// Listing
// ============================================================================

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_claims_listed_newest_first() {
        let (clock, _ledger, service) = setup();
        let alice = AddressFixtures::alice();
        let bob = AddressFixtures::bob();

        let first = service.submit_claim(&alice, Amount::from_units(1), None).await.unwrap();
        clock.advance(Duration::seconds(30));
        service.submit_claim(&bob, Amount::from_units(2), None).await.unwrap();
        clock.advance(Duration::seconds(30));
        let third = service.submit_claim(&alice, Amount::from_units(3), None).await.unwrap();

        let mine = service.list_claims_for(&alice).await.unwrap();
        assert_eq!(mine.iter().map(|c| c.id).collect::<Vec<_>>(), vec![third, first]);

        let all = service.list_all_claims().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_newest_first(&all);
        assert_eq!(service.snapshot().await.claims, all);
    }

    #[tokio::test]
    async fn test_generated_document_reference() {
        let (_clock, _ledger, service) = setup();
        let alice = AddressFixtures::alice();
        let id = service.submit_claim(&alice, Amount::from_units(1), None).await.unwrap();

        let reference = service.get_claim(id).await.unwrap().document_reference.unwrap();
        assert!(reference.starts_with("ipfs-"));
        assert!(reference.ends_with(&alice.as_str()[2..8]));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_review_keeps_claim_consistent(requested in requested_amount_strategy(), s in fraud_score_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(async {
            let (_clock, _ledger, service) = setup();
            let admin = AddressFixtures::admin();
            let id = service.submit_claim(&AddressFixtures::alice(), requested, None).await.unwrap();

            let claim = service.review_claim(&admin, id, s, None).await.unwrap();
            assert_claim_consistent(&claim);
            assert!(claim.approved_amount <= requested);
            assert_eq!(claim.status == ClaimStatus::Denied, claim.approved_amount.is_zero());
        });
    }
}
