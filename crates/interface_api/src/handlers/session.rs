//! Session handlers

use axum::{extract::State, Extension, Json};

use crate::auth::Caller;
use crate::dto::session::SessionResponse;
use crate::{error::ApiError, AppState};

/// Describes the connected wallet and its role
pub async fn get_session(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<SessionResponse>, ApiError> {
    let is_admin = state.service.is_admin(&caller.0).await?;
    Ok(Json(SessionResponse {
        address: caller.0.to_string(),
        address_short: caller.0.short(),
        is_admin,
    }))
}
