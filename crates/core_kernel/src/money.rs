//! Monetary amounts in the ledger's smallest unit
//!
//! The external ledger keeps every balance and claim amount as an unsigned
//! integer of its smallest denomination (18 decimal places for ether-style
//! ledgers). `Amount` keeps that representation exactly and only converts to
//! decimal text at the edges, using rust_decimal for parsing so that user
//! input like `"1.5"` never passes through floating point. Serialized amounts
//! are strings of smallest units, since JSON numbers cannot carry 128 bits.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimal places of the ledger's native unit
pub const ETHER_DECIMALS: u32 = 18;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Negative amount: {0}")]
    Negative(String),

    #[error("Amount {0} has more than {1} decimal places")]
    TooPrecise(String, u32),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A non-negative quantity of the ledger's smallest unit
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    /// Zero units
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from a count of smallest units
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Creates a zero amount
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Returns the count of smallest units
    pub const fn units(&self) -> u128 {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(&self, other: Amount) -> Result<Amount, MoneyError> {
        self.0.checked_add(other.0).map(Amount).ok_or(MoneyError::Overflow)
    }

    /// Checked subtraction; fails rather than going below zero
    pub fn checked_sub(&self, other: Amount) -> Result<Amount, MoneyError> {
        self.0.checked_sub(other.0).map(Amount).ok_or(MoneyError::Overflow)
    }

    /// Parses decimal text expressed in whole units into smallest units
    ///
    /// # Arguments
    ///
    /// * `text` - Decimal text such as `"1.5"` or `"0.001"`
    /// * `decimals` - Number of decimal places of the whole unit
    ///
    /// # Errors
    ///
    /// Rejects non-numeric text, negative values, values with more fractional
    /// digits than `decimals`, and values that do not fit in 128 bits.
    pub fn parse_units(text: &str, decimals: u32) -> Result<Amount, MoneyError> {
        let trimmed = text.trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|_| MoneyError::InvalidAmount(trimmed.to_string()))?;

        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative(trimmed.to_string()));
        }

        let value = value.normalize();
        if value.scale() > decimals {
            return Err(MoneyError::TooPrecise(trimmed.to_string(), decimals));
        }

        // mantissa * 10^(decimals - scale) is exact once the scale fits
        let mantissa = value
            .mantissa()
            .to_u128()
            .ok_or_else(|| MoneyError::InvalidAmount(trimmed.to_string()))?;
        let factor = 10u128
            .checked_pow(decimals - value.scale())
            .ok_or(MoneyError::Overflow)?;

        mantissa
            .checked_mul(factor)
            .map(Amount)
            .ok_or(MoneyError::Overflow)
    }

    /// Parses decimal ether text into wei
    pub fn parse_ether(text: &str) -> Result<Amount, MoneyError> {
        Self::parse_units(text, ETHER_DECIMALS)
    }

    /// Formats the amount in whole units
    ///
    /// Trailing zeros are trimmed but at least one fractional digit is kept,
    /// so one ether renders as `"1.0"`.
    pub fn format_units(&self, decimals: u32) -> String {
        let Some(base) = 10u128.checked_pow(decimals) else {
            return self.0.to_string();
        };

        let whole = self.0 / base;
        let fraction = self.0 % base;
        if decimals == 0 {
            return whole.to_string();
        }

        let digits = format!("{:0width$}", fraction, width = decimals as usize);
        let digits = digits.trim_end_matches('0');
        if digits.is_empty() {
            format!("{}.0", whole)
        } else {
            format!("{}.{}", whole, digits)
        }
    }

    /// Formats the amount in ether
    pub fn format_ether(&self) -> String {
        self.format_units(ETHER_DECIMALS)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units as u128)
    }
}

impl TryFrom<String> for Amount {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .trim()
            .parse::<u128>()
            .map(Amount)
            .map_err(|_| MoneyError::InvalidAmount(value))
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> String {
        amount.0.to_string()
    }
}

impl From<Amount> for u128 {
    fn from(amount: Amount) -> u128 {
        amount.0
    }
}
