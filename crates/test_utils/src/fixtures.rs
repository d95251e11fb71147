//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the identities, amounts and times
//! that recur across the claims test suite. Values are fixed so failures
//! are reproducible.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{AccountAddress, Amount};

/// Fixture for account identities
pub struct AddressFixtures;

impl AddressFixtures {
    /// The ledger owner used throughout the tests
    pub fn admin() -> AccountAddress {
        Self::parse("0xad00000000000000000000000000000000000001")
    }

    /// A policyholder
    pub fn alice() -> AccountAddress {
        Self::parse("0xa11ce00000000000000000000000000000000002")
    }

    /// A second policyholder
    pub fn bob() -> AccountAddress {
        Self::parse("0xb0b0000000000000000000000000000000000003")
    }

    /// An identity with no relationship to the ledger
    pub fn stranger() -> AccountAddress {
        Self::parse("0x5742000000000000000000000000000000000004")
    }

    fn parse(text: &str) -> AccountAddress {
        AccountAddress::new(text).expect("fixture address is valid")
    }
}

/// Fixture for ledger amounts
pub struct AmountFixtures;

impl AmountFixtures {
    /// One whole ether
    pub fn one_ether() -> Amount {
        Amount::from_units(1_000_000_000_000_000_000)
    }

    /// A typical claim request
    pub fn claim_request() -> Amount {
        Amount::from_units(1_000)
    }

    /// Treasury balance large enough for every scenario
    pub fn funded_treasury() -> Amount {
        Amount::from_units(1_000_000)
    }
}

/// Fixture for ledger times
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Block time at which scenario ledgers start (Nov 14, 2023)
    pub fn genesis() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
    }

    /// `genesis` as unix seconds
    pub fn genesis_unix() -> i64 {
        Self::genesis().timestamp()
    }
}

/// Fixture for document references
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// An uploaded evidence bundle
    pub fn evidence() -> String {
        "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".to_string()
    }
}
