//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use core_kernel::Amount;
use domain_claims::{views_newest_first, ClaimView, FraudScore};

use crate::auth::Caller;
use crate::dto::claims::*;
use crate::handlers::{parse_claim_id, parse_optional_amount, require_admin};
use crate::{error::ApiError, AppState};

/// Submits a claim for the caller
pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<SubmitClaimRequest>,
) -> Result<(StatusCode, Json<SubmitClaimResponse>), ApiError> {
    request.validate()?;
    let amount = Amount::parse_ether(&request.amount)?;

    let claim_id = state
        .service
        .submit_claim(&caller.0, amount, request.document_reference)
        .await?;
    let claim = state.service.get_claim(claim_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitClaimResponse { claim_id, claim: ClaimView::from(&claim) }),
    ))
}

/// Lists the caller's own claims, newest first
pub async fn list_my_claims(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<ClaimView>>, ApiError> {
    let claims = state.service.list_claims_for(&caller.0).await?;
    Ok(Json(views_newest_first(claims)))
}

/// Lists every claim, newest first
pub async fn list_all_claims(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<ClaimView>>, ApiError> {
    require_admin(&state, &caller).await?;
    let claims = state.service.list_all_claims().await?;
    Ok(Json(views_newest_first(claims)))
}

/// Gets a claim visible to the caller
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<ClaimView>, ApiError> {
    let claim_id = parse_claim_id(&id)?;
    let claim = state.service.get_claim(claim_id).await?;

    if claim.policyholder != caller.0 {
        require_admin(&state, &caller).await?;
    }
    Ok(Json(ClaimView::from(&claim)))
}

/// Previews the review of a claim at a given fraud score
pub async fn suggest(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    query.validate()?;
    require_admin(&state, &caller).await?;
    let claim_id = parse_claim_id(&id)?;

    let plan = state
        .service
        .plan_review(claim_id, FraudScore::new(query.fraud_score)?, None)
        .await?;
    Ok(Json(SuggestionResponse::new(claim_id, &plan)))
}

/// Records a scored review
pub async fn review_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(request): Json<ReviewClaimRequest>,
) -> Result<Json<ClaimView>, ApiError> {
    request.validate()?;
    let claim_id = parse_claim_id(&id)?;
    let score = FraudScore::new(request.fraud_score)?;
    let amount = parse_optional_amount(request.approved_amount.as_deref())?;

    let claim = state.service.review_claim(&caller.0, claim_id, score, amount).await?;
    Ok(Json(ClaimView::from(&claim)))
}

/// Records a manual approve or deny
pub async fn override_claim(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(request): Json<OverrideClaimRequest>,
) -> Result<Json<ClaimView>, ApiError> {
    request.validate()?;
    let claim_id = parse_claim_id(&id)?;
    let amount = parse_optional_amount(request.amount.as_deref())?;

    let claim = state
        .service
        .override_claim(&caller.0, claim_id, request.approved, amount)
        .await?;
    Ok(Json(ClaimView::from(&claim)))
}

/// Pays out an approved claim
pub async fn execute_payout(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<ClaimView>, ApiError> {
    let claim_id = parse_claim_id(&id)?;
    let claim = state.service.execute_payout(&caller.0, claim_id).await?;
    Ok(Json(ClaimView::from(&claim)))
}
