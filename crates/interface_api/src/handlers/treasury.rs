//! Treasury handlers

use axum::{extract::State, Extension, Json};
use validator::Validate;

use core_kernel::Amount;

use crate::auth::Caller;
use crate::dto::treasury::{BalanceResponse, TreasuryRequest};
use crate::{error::ApiError, AppState};

/// Treasury balance
pub async fn get_balance(
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, ApiError> {
    Ok(Json(state.service.balance().await?.into()))
}

/// Adds funds to the treasury
pub async fn deposit(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<TreasuryRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    request.validate()?;
    let amount = Amount::parse_ether(&request.amount)?;

    state.service.deposit(&caller.0, amount).await?;
    Ok(Json(state.service.balance().await?.into()))
}

/// Withdraws treasury funds to the owner
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<TreasuryRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    request.validate()?;
    let amount = Amount::parse_ether(&request.amount)?;

    state.service.withdraw(&caller.0, amount).await?;
    Ok(Json(state.service.balance().await?.into()))
}
