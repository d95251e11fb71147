//! Claims domain errors

use thiserror::Error;

use core_kernel::{ClaimId, MoneyError, PortError};

use crate::claim::ClaimStatus;
use crate::lifecycle::ClaimOperation;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid transition: cannot {operation} a claim that is {from}")]
    InvalidTransition {
        from: ClaimStatus,
        operation: ClaimOperation,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid score {value}: must be between 0 and 100")]
    InvalidScore { value: u16 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Claim not found: {0}")]
    NotFound(ClaimId),

    #[error("Unknown claim status code: {0}")]
    UnknownStatusCode(u8),

    #[error("A {0} request is already in progress")]
    OperationInProgress(String),

    #[error("Ledger call failed: {0}")]
    ExternalCallFailed(String),
}

impl ClaimError {
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        ClaimError::InvalidAmount(message.into())
    }

    /// Maps an adapter error for a call concerning `claim_id` onto the domain
    ///
    /// Ledger reverts and transport failures are both reported as
    /// `ExternalCallFailed`; the message is kept for display.
    pub fn from_port(error: PortError, claim_id: Option<ClaimId>) -> Self {
        match error {
            PortError::NotFound { .. } => match claim_id {
                Some(id) => ClaimError::NotFound(id),
                None => ClaimError::ExternalCallFailed(error.to_string()),
            },
            PortError::Unauthorized { message } => ClaimError::Unauthorized(message),
            other => ClaimError::ExternalCallFailed(other.to_string()),
        }
    }
}

impl From<MoneyError> for ClaimError {
    fn from(err: MoneyError) -> Self {
        ClaimError::InvalidAmount(err.to_string())
    }
}

impl From<PortError> for ClaimError {
    fn from(err: PortError) -> Self {
        ClaimError::from_port(err, None)
    }
}
