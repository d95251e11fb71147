//! Claims DTOs
//!
//! Amounts in requests are decimal text in whole ether; amounts in
//! responses are strings of the smallest unit alongside a display form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Amount, ClaimId};
use domain_claims::{ClaimView, ReviewPlan, Suggestion};

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitClaimRequest {
    #[validate(length(min = 1, max = 80))]
    pub amount: String,
    #[validate(length(max = 256))]
    pub document_reference: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewClaimRequest {
    #[validate(range(max = 100))]
    pub fraud_score: u16,
    /// Overrides the amount derived from the score
    #[validate(length(min = 1, max = 80))]
    pub approved_amount: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OverrideClaimRequest {
    pub approved: bool,
    /// Defaults to the full request when approving
    #[validate(length(min = 1, max = 80))]
    pub amount: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SuggestionQuery {
    #[validate(range(max = 100))]
    pub fraud_score: u16,
}

#[derive(Debug, Serialize)]
pub struct SubmitClaimResponse {
    pub claim_id: ClaimId,
    pub claim: ClaimView,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub claim_id: ClaimId,
    pub fraud_score: u8,
    pub threshold: u8,
    pub suggestion: Suggestion,
    pub derived_amount: Amount,
    pub derived_display: String,
    pub approves: bool,
}

impl SuggestionResponse {
    pub fn new(claim_id: ClaimId, plan: &ReviewPlan) -> Self {
        Self {
            claim_id,
            fraud_score: plan.fraud_score.value(),
            threshold: plan.threshold.value(),
            suggestion: plan.suggestion,
            derived_amount: plan.derived_amount,
            derived_display: plan.derived_amount.format_ether(),
            approves: plan.approves,
        }
    }
}
