//! Dashboard handlers

use axum::{extract::State, Extension, Json};

use crate::auth::Caller;
use crate::dto::dashboard::DashboardResponse;
use crate::{error::ApiError, AppState};

/// Ledger summary from the service's cached snapshot
///
/// The owner sees every claim; anyone else sees only their own.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let snapshot = state.service.current_snapshot().await?;

    let claims = if snapshot.owner.as_ref() == Some(&caller.0) {
        snapshot.claims.clone()
    } else {
        snapshot.claims_for(&caller.0)
    };
    Ok(Json(DashboardResponse::new(&snapshot, claims)))
}
