//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claim data that maintains
//! domain invariants.

use proptest::prelude::*;

use core_kernel::{AccountAddress, Amount};
use domain_claims::{ClaimOperation, ClaimStatus, FraudScore, Threshold};

/// Strategy for generating positive requested amounts
pub fn requested_amount_strategy() -> impl Strategy<Value = Amount> {
    (1u128..=1_000_000_000_000_000_000_000u128).prop_map(Amount::from_units)
}

/// Strategy for generating any amount, including zero and very large ones
pub fn any_amount_strategy() -> impl Strategy<Value = Amount> {
    any::<u128>().prop_map(Amount::from_units)
}

/// Strategy for generating valid fraud scores
pub fn fraud_score_strategy() -> impl Strategy<Value = FraudScore> {
    (0u16..=100).prop_map(|s| FraudScore::new(s).expect("score in range"))
}

/// Strategy for generating valid thresholds
pub fn threshold_strategy() -> impl Strategy<Value = Threshold> {
    (0u16..=100).prop_map(|t| Threshold::new(t).expect("threshold in range"))
}

/// Strategy for generating out-of-range score inputs
pub fn invalid_score_strategy() -> impl Strategy<Value = u16> {
    101u16..=u16::MAX
}

/// Strategy for generating claim statuses
pub fn status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

/// Strategy for generating lifecycle operations
pub fn operation_strategy() -> impl Strategy<Value = ClaimOperation> {
    prop::sample::select(ClaimOperation::ALL.to_vec())
}

/// Strategy for generating hex account addresses
pub fn address_strategy() -> impl Strategy<Value = AccountAddress> {
    "0x[0-9a-f]{40}".prop_map(|s| AccountAddress::new(s).expect("non-empty address"))
}

/// Strategy for generating ether-denominated decimal text with up to 18 places
pub fn ether_text_strategy() -> impl Strategy<Value = String> {
    (0u64..1_000_000u64, proptest::option::of(1u64..1_000_000_000_000_000_000u64)).prop_map(
        |(whole, fraction)| match fraction {
            Some(f) => format!("{}.{:018}", whole, f),
            None => whole.to_string(),
        },
    )
}
