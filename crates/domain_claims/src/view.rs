//! Display projections of claims

use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::{Amount, ClaimId};
use crate::claim::{Claim, ClaimStatus};
use crate::lifecycle::{transition, ClaimOperation};

/// Sorts claims newest first, breaking ties by descending id
pub fn sort_newest_first(claims: &mut [Claim]) {
    claims.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

/// A claim as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimView {
    pub id: ClaimId,
    pub status: ClaimStatus,
    pub status_label: &'static str,
    pub policyholder: String,
    pub policyholder_short: String,
    pub requested_amount: Amount,
    pub requested_display: String,
    /// Present once a decision has been recorded
    pub approved_display: Option<String>,
    /// Present once the claim has been scored
    pub fraud_score: Option<u8>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub document_reference: Option<String>,
    pub reviewer_short: Option<String>,
    /// Approve/deny controls apply
    pub can_decide: bool,
    /// Payout control applies
    pub can_pay_out: bool,
}

impl From<&Claim> for ClaimView {
    fn from(claim: &Claim) -> Self {
        Self {
            id: claim.id,
            status: claim.status,
            status_label: claim.status.label(),
            policyholder: claim.policyholder.to_string(),
            policyholder_short: claim.policyholder.short(),
            requested_amount: claim.requested_amount,
            requested_display: claim.requested_amount.format_ether(),
            approved_display: claim
                .is_decided()
                .then(|| claim.approved_amount.format_ether()),
            fraud_score: claim
                .fraud_score
                .is_scored()
                .then(|| claim.fraud_score.value()),
            submitted_at: claim.submitted_at(),
            document_reference: claim.document_reference.clone(),
            reviewer_short: claim.reviewer.as_ref().map(|r| r.short()),
            can_decide: transition(claim.status, ClaimOperation::Decide { approved: true }).is_some(),
            can_pay_out: transition(claim.status, ClaimOperation::Payout).is_some(),
        }
    }
}

/// Projects claims for display, newest first
pub fn views_newest_first(mut claims: Vec<Claim>) -> Vec<ClaimView> {
    sort_newest_first(&mut claims);
    claims.iter().map(ClaimView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::AccountAddress;
    use crate::payout::FraudScore;

    fn claim(id: u64, timestamp: u64) -> Claim {
        Claim::submitted(
            ClaimId::new(id),
            AccountAddress::new("0xabcdef0123456789abcdef0123456789abcdef01").unwrap(),
            Amount::from_units(1_500_000_000_000_000_000),
            None,
            timestamp,
        )
    }

    #[test]
    fn test_sort_newest_first() {
        let mut claims = vec![claim(0, 10), claim(1, 30), claim(2, 20), claim(3, 30)];
        sort_newest_first(&mut claims);
        let ids: Vec<u64> = claims.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_pending_view_hides_review_fields() {
        let view = ClaimView::from(&claim(0, 0));
        assert_eq!(view.status_label, "Pending");
        assert_eq!(view.requested_display, "1.5");
        assert_eq!(view.policyholder_short, "0xabcdef01...abcdef01");
        assert!(view.approved_display.is_none());
        assert!(view.fraud_score.is_none());
        assert!(view.can_decide);
        assert!(!view.can_pay_out);
    }

    #[test]
    fn test_approved_view() {
        let mut c = claim(0, 0);
        c.status = ClaimStatus::Approved;
        c.approved_amount = Amount::from_units(1_000_000_000_000_000_000);
        c.fraud_score = FraudScore::new(40).unwrap();
        let view = ClaimView::from(&c);
        assert_eq!(view.approved_display.as_deref(), Some("1.0"));
        assert_eq!(view.fraud_score, Some(40));
        assert!(!view.can_decide);
        assert!(view.can_pay_out);
    }

    #[test]
    fn test_denied_view_shows_zero_amount() {
        let mut c = claim(0, 0);
        c.status = ClaimStatus::Denied;
        let view = ClaimView::from(&c);
        assert_eq!(view.approved_display.as_deref(), Some("0.0"));
        assert!(!view.can_decide);
        assert!(!view.can_pay_out);
    }
}
