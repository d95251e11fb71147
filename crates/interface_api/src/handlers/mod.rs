//! Request handlers

pub mod health;
pub mod session;
pub mod claims;
pub mod settings;
pub mod treasury;
pub mod events;
pub mod dashboard;

use core_kernel::{Amount, ClaimId};

use crate::auth::Caller;
use crate::error::ApiError;
use crate::AppState;

/// Parses a claim id path segment, with or without the `CLM-` prefix
pub(crate) fn parse_claim_id(raw: &str) -> Result<ClaimId, ApiError> {
    Ok(raw.parse::<ClaimId>()?)
}

/// Parses optional whole-ether text
pub(crate) fn parse_optional_amount(raw: Option<&str>) -> Result<Option<Amount>, ApiError> {
    raw.map(Amount::parse_ether).transpose().map_err(ApiError::from)
}

/// Rejects callers that do not currently own the ledger
pub(crate) async fn require_admin(state: &AppState, caller: &Caller) -> Result<(), ApiError> {
    if state.service.is_admin(&caller.0).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!("{} is not the ledger owner", caller.0.short())))
    }
}
