//! Dashboard DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::Amount;
use domain_claims::{views_newest_first, Claim, ClaimView, DashboardSnapshot};

/// Ledger summary and the claims visible to the caller
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub owner: Option<String>,
    pub owner_short: Option<String>,
    pub threshold: u8,
    pub balance: Amount,
    pub balance_display: String,
    pub total_claims: u64,
    pub claims: Vec<ClaimView>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl DashboardResponse {
    /// Builds the response from a snapshot, keeping `claims` as given
    pub fn new(snapshot: &DashboardSnapshot, claims: Vec<Claim>) -> Self {
        Self {
            owner: snapshot.owner.as_ref().map(|o| o.to_string()),
            owner_short: snapshot.owner.as_ref().map(|o| o.short()),
            threshold: snapshot.threshold.value(),
            balance: snapshot.balance,
            balance_display: snapshot.balance.format_ether(),
            total_claims: snapshot.total_claims,
            claims: views_newest_first(claims),
            refreshed_at: snapshot.refreshed_at,
        }
    }
}
