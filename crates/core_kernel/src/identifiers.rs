//! Strongly-typed identifiers for ledger entities
//!
//! Claim identifiers are assigned by the external ledger from a monotonic
//! counter, and identities are the wallet addresses the ledger verifies.
//! Newtype wrappers keep the two from being mixed with plain integers and
//! strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when parsing identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Invalid claim id: {0}")]
    InvalidClaimId(String),

    #[error("Account address must not be empty")]
    EmptyAddress,
}

/// Ledger-assigned claim identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(u64);

impl ClaimId {
    /// Creates an identifier from the ledger's counter value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw counter value
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the identifier prefix for display
    pub fn prefix() -> &'static str {
        "CLM"
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", Self::prefix(), self.0)
    }
}

impl FromStr for ClaimId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Strip prefix if present
        let raw = s.strip_prefix("CLM-").unwrap_or(s);
        raw.parse::<u64>()
            .map(Self)
            .map_err(|_| IdentifierError::InvalidClaimId(s.to_string()))
    }
}

impl From<u64> for ClaimId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ClaimId> for u64 {
    fn from(id: ClaimId) -> u64 {
        id.0
    }
}

/// Wallet address identifying a ledger account
///
/// Addresses compare case-insensitively; the canonical form is lower-case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Creates an address, normalising it to lower-case
    pub fn new(address: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = address.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::EmptyAddress);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the canonical address text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display: first 10 characters, an ellipsis, last 8
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 18 {
            return self.0.clone();
        }
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountAddress {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> String {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_id_display() {
        assert_eq!(ClaimId::new(7).to_string(), "CLM-7");
    }

    #[test]
    fn test_claim_id_parsing() {
        let parsed: ClaimId = "CLM-42".parse().unwrap();
        assert_eq!(parsed, ClaimId::new(42));
        let bare: ClaimId = "42".parse().unwrap();
        assert_eq!(bare, parsed);
        assert!("CLM-x".parse::<ClaimId>().is_err());
    }

    #[test]
    fn test_address_case_insensitive() {
        let upper = AccountAddress::new("0xABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        let lower = AccountAddress::new("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_address_short() {
        let address = AccountAddress::new("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        assert_eq!(address.short(), "0xabcdef01...abcdef01");
        assert_eq!(AccountAddress::new("0xabc").unwrap().short(), "0xabc");
    }

    #[test]
    fn test_empty_address_rejected() {
        assert_eq!(AccountAddress::new("  "), Err(IdentifierError::EmptyAddress));
    }
}
