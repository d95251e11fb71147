//! Fraud scores, the approval threshold, and payout derivation
//!
//! The payout curve has two segments:
//!
//! ```text
//! score  0..=50   -> full requested amount
//! score 51..=100  -> floor(requested * (100 - score) * 2 / 100)
//! ```
//!
//! The slope changes at 50, so a score of 51 already pays 98% while a
//! score of 100 pays nothing. The ledger's review flow uses this exact
//! curve and it is kept as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Amount;
use crate::error::ClaimError;

/// Highest score or threshold
pub const MAX_SCORE: u8 = 100;

/// Scores at or below this pay the full requested amount
pub const FULL_PAYOUT_CEILING: u8 = 50;

fn check_range(value: u16) -> Result<u8, ClaimError> {
    if value > MAX_SCORE as u16 {
        return Err(ClaimError::InvalidScore { value });
    }
    Ok(value as u8)
}

/// Administrator-assigned fraud suspicion in `[0, 100]`
///
/// Zero doubles as "not yet scored".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u16", into = "u8")]
pub struct FraudScore(u8);

impl FraudScore {
    /// The score of a claim that has not been reviewed
    pub const UNSCORED: FraudScore = FraudScore(0);

    /// Creates a score, rejecting values above 100
    pub fn new(value: u16) -> Result<Self, ClaimError> {
        check_range(value).map(Self)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true once a non-zero score has been recorded
    pub fn is_scored(&self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<u16> for FraudScore {
    type Error = ClaimError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FraudScore> for u8 {
    fn from(score: FraudScore) -> u8 {
        score.0
    }
}

impl fmt::Display for FraudScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Score cutoff below which approval is suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u8")]
pub struct Threshold(u8);

impl Threshold {
    /// Initial threshold of a freshly deployed ledger
    pub const DEFAULT: Threshold = Threshold(70);

    /// Creates a threshold, rejecting values above 100
    pub fn new(value: u16) -> Result<Self, ClaimError> {
        check_range(value).map(Self)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u16> for Threshold {
    type Error = ClaimError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for u8 {
    fn from(threshold: Threshold) -> u8 {
        threshold.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pure payout and suggestion calculations
pub struct PayoutCalculator;

impl PayoutCalculator {
    /// Derives the default approved amount for a fraud score
    ///
    /// # Arguments
    ///
    /// * `requested` - Amount the policyholder asked for
    /// * `score` - Fraud score assigned at review
    ///
    /// # Returns
    ///
    /// An amount in `[0, requested]`, non-increasing in `score`
    pub fn derive_amount(requested: Amount, score: FraudScore) -> Amount {
        if score.value() <= FULL_PAYOUT_CEILING {
            return requested;
        }

        // factor is in [0, 98] so the result never exceeds the request
        let factor = (MAX_SCORE - score.value()) as u128 * 2;
        let units = requested.units();

        // floor(units * factor / 100) without overflowing u128
        let derived = (units / 100) * factor + (units % 100) * factor / 100;
        Amount::from_units(derived.min(units))
    }

    /// Suggests approval when the score is strictly below the threshold
    ///
    /// Advisory only; administrators may override in either direction.
    pub fn decide_automatically(score: FraudScore, threshold: Threshold) -> bool {
        score.value() < threshold.value()
    }
}
