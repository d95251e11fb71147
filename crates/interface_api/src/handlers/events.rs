//! Ledger event handlers

use axum::{extract::State, Extension, Json};

use domain_claims::ClaimEvent;

use crate::auth::Caller;
use crate::handlers::require_admin;
use crate::{error::ApiError, AppState};

/// Ledger event log, oldest first
pub async fn list_events(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<ClaimEvent>>, ApiError> {
    require_admin(&state, &caller).await?;
    Ok(Json(state.service.events().await?))
}
