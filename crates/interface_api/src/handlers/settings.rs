//! Settings handlers

use axum::{extract::State, Extension, Json};
use validator::Validate;

use core_kernel::AccountAddress;
use domain_claims::Threshold;

use crate::auth::Caller;
use crate::dto::settings::{
    OwnerResponse, SetThresholdRequest, ThresholdResponse, TransferOwnershipRequest,
};
use crate::{error::ApiError, AppState};

/// Current approval threshold
pub async fn get_threshold(
    State(state): State<AppState>,
) -> Result<Json<ThresholdResponse>, ApiError> {
    let threshold = state.service.threshold().await?;
    Ok(Json(ThresholdResponse { threshold: threshold.value() }))
}

/// Replaces the approval threshold
pub async fn set_threshold(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<SetThresholdRequest>,
) -> Result<Json<ThresholdResponse>, ApiError> {
    request.validate()?;
    let threshold = Threshold::new(request.threshold)?;

    state.service.set_threshold(&caller.0, threshold).await?;
    Ok(Json(ThresholdResponse { threshold: threshold.value() }))
}

/// Hands administrative rights to another wallet
pub async fn transfer_ownership(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<TransferOwnershipRequest>,
) -> Result<Json<OwnerResponse>, ApiError> {
    request.validate()?;
    let new_owner = AccountAddress::new(&request.new_owner)?;

    state.service.transfer_ownership(&caller.0, new_owner.clone()).await?;
    Ok(Json(OwnerResponse {
        owner: new_owner.to_string(),
        owner_short: new_owner.short(),
    }))
}
