//! Ledger error types
//!
//! These are the reasons the ledger reverts a write. Adapters hand them to
//! the domain as `PortError`s.

use thiserror::Error;

use core_kernel::{AccountAddress, Amount, ClaimId, PortError};
use domain_claims::ClaimError;

/// Reasons the ledger rejects a call
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller is not the ledger owner
    #[error("Caller {0} is not the owner")]
    NotOwner(AccountAddress),

    /// No claim with this id was ever submitted
    #[error("Claim {0} does not exist")]
    ClaimNotFound(ClaimId),

    /// The claim rules refused the write
    #[error("Claim rule violated: {0}")]
    Rejected(#[from] ClaimError),

    /// Submissions, deposits and withdrawals must move funds
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Treasury cannot cover the transfer
    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// Balance arithmetic overflowed
    #[error("Balance overflow")]
    Overflow,
}

impl LedgerError {
    /// Checks if this error is an authorization failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LedgerError::NotOwner(_))
    }
}

/// Converts ledger errors to port errors
///
/// - `NotOwner` -> `PortError::Unauthorized`
/// - `ClaimNotFound` -> `PortError::NotFound`
/// - `ZeroAmount` -> `PortError::Validation`
/// - Everything else -> `PortError::Conflict`
impl From<LedgerError> for PortError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotOwner(_) => PortError::unauthorized(err.to_string()),
            LedgerError::ClaimNotFound(id) => PortError::not_found("Claim", id),
            LedgerError::ZeroAmount => PortError::validation_field(err.to_string(), "amount"),
            other => PortError::conflict(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_to_port_error() {
        let owner = AccountAddress::new("0x01").unwrap();
        assert!(PortError::from(LedgerError::NotOwner(owner)).is_unauthorized());
        assert!(PortError::from(LedgerError::ClaimNotFound(ClaimId::new(3))).is_not_found());

        let conflict = PortError::from(LedgerError::InsufficientBalance {
            needed: Amount::from_units(2),
            available: Amount::from_units(1),
        });
        assert!(matches!(conflict, PortError::Conflict { .. }));
        assert!(conflict.to_string().contains("need 2, have 1"));
    }
}
