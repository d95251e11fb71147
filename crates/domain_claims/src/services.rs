//! Claims domain services
//!
//! `ClaimsService` is the client side of the ledger. For each write it:
//! 1. Marks the write in flight for the caller, refusing a duplicate
//! 2. Validates locally against the mirrored claim (status, amounts, admin)
//! 3. Issues exactly one ledger call, with no retry
//! 4. Refreshes the read cache, whatever the outcome
//!
//! Mutual exclusion between different callers is the ledger's job: a second
//! write against an already transitioned claim is rejected there.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use core_kernel::{AccountAddress, Amount, ClaimId, PortError};
use crate::claim::Claim;
use crate::error::ClaimError;
use crate::events::ClaimEvent;
use crate::lifecycle::{require_transition, ClaimOperation};
use crate::payout::{FraudScore, Threshold};
use crate::ports::ClaimsLedgerPort;
use crate::review::{OverridePlan, ReviewPlan, Submission};
use crate::view::sort_newest_first;

/// What a pending write is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteTarget {
    Submission,
    Claim(ClaimId),
    Threshold,
    Treasury,
    Ownership,
}

impl WriteTarget {
    fn describe(&self) -> String {
        match self {
            WriteTarget::Submission => "claim submission".to_string(),
            WriteTarget::Claim(id) => format!("{} update", id),
            WriteTarget::Threshold => "threshold update".to_string(),
            WriteTarget::Treasury => "treasury".to_string(),
            WriteTarget::Ownership => "ownership transfer".to_string(),
        }
    }
}

type InFlightKey = (AccountAddress, WriteTarget);

/// Releases an in-flight marker when dropped
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<InFlightKey>>,
    key: InFlightKey,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(
        set: &'a Mutex<HashSet<InFlightKey>>,
        caller: &AccountAddress,
        target: WriteTarget,
    ) -> Result<Self, ClaimError> {
        let key = (caller.clone(), target);
        let mut pending = set.lock().unwrap_or_else(|e| e.into_inner());
        if !pending.insert(key.clone()) {
            return Err(ClaimError::OperationInProgress(target.describe()));
        }
        Ok(Self { set, key })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut pending = self.set.lock().unwrap_or_else(|e| e.into_inner());
        pending.remove(&self.key);
    }
}

/// Cached view of the ledger, refreshed after every write
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    /// Every claim, newest first
    pub claims: Vec<Claim>,
    pub threshold: Threshold,
    pub balance: Amount,
    /// Claims ever submitted, as counted by the ledger
    pub total_claims: u64,
    pub owner: Option<AccountAddress>,
    /// None until the first successful refresh
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    /// Claims of one policyholder, newest first
    pub fn claims_for(&self, policyholder: &AccountAddress) -> Vec<Claim> {
        self.claims
            .iter()
            .filter(|c| c.policyholder == *policyholder)
            .cloned()
            .collect()
    }
}

/// Service for driving claims through the external ledger
pub struct ClaimsService {
    ledger: Arc<dyn ClaimsLedgerPort>,
    snapshot: RwLock<DashboardSnapshot>,
    in_flight: Mutex<HashSet<InFlightKey>>,
}

impl ClaimsService {
    /// Creates a service over a ledger port
    pub fn new(ledger: Arc<dyn ClaimsLedgerPort>) -> Self {
        Self {
            ledger,
            snapshot: RwLock::new(DashboardSnapshot::default()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The underlying ledger port
    pub fn ledger(&self) -> &Arc<dyn ClaimsLedgerPort> {
        &self.ledger
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// Returns true if `caller` currently holds administrative rights
    pub async fn is_admin(&self, caller: &AccountAddress) -> Result<bool, ClaimError> {
        let owner = self.ledger.owner().await?;
        Ok(owner == *caller)
    }

    async fn require_admin(&self, caller: &AccountAddress) -> Result<(), ClaimError> {
        if !self.is_admin(caller).await? {
            return Err(ClaimError::Unauthorized(format!(
                "{} is not the ledger owner",
                caller.short()
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Claim writes
    // ========================================================================

    /// Submits a new claim on behalf of `caller`
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a zero request, `OperationInProgress` while the
    /// caller's previous submission is outstanding, `ExternalCallFailed`
    /// when the ledger rejects the write.
    pub async fn submit_claim(
        &self,
        caller: &AccountAddress,
        requested_amount: Amount,
        document_reference: Option<String>,
    ) -> Result<ClaimId, ClaimError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, WriteTarget::Submission)?;
        let submission = Submission::new(
            caller,
            requested_amount,
            document_reference,
            Utc::now().timestamp_millis(),
        )?;

        let claim_id = self
            .write("submit_claim", None, || {
                self.ledger.submit_claim(
                    caller,
                    submission.requested_amount,
                    submission.document_reference.clone(),
                )
            })
            .await?;

        info!(
            claim_id = %claim_id,
            policyholder = %caller,
            requested = %submission.requested_amount,
            "Claim submitted"
        );
        Ok(claim_id)
    }

    /// Previews a scored review without writing anything
    pub async fn plan_review(
        &self,
        claim_id: ClaimId,
        fraud_score: FraudScore,
        manual_amount: Option<Amount>,
    ) -> Result<ReviewPlan, ClaimError> {
        let claim = self.get_claim(claim_id).await?;
        let threshold = self.ledger.threshold().await?;
        ReviewPlan::build(&claim, fraud_score, threshold, manual_amount)
    }

    /// Records a scored review
    ///
    /// Without `manual_amount` the approved amount is derived from the
    /// payout curve. Admin only.
    pub async fn review_claim(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
        fraud_score: FraudScore,
        manual_amount: Option<Amount>,
    ) -> Result<Claim, ClaimError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, WriteTarget::Claim(claim_id))?;
        self.require_admin(caller).await?;
        let plan = self.plan_review(claim_id, fraud_score, manual_amount).await?;

        debug!(
            claim_id = %claim_id,
            fraud_score = %plan.fraud_score,
            derived = %plan.derived_amount,
            approved = %plan.approved_amount,
            suggestion = ?plan.suggestion,
            "Review planned"
        );

        self.write("review_claim", Some(claim_id), || {
            self.ledger.review_claim(caller, claim_id, plan.fraud_score, plan.approved_amount)
        })
        .await?;

        self.get_claim(claim_id).await
    }

    /// Records a manual approve or deny, ignoring any fraud score
    ///
    /// Approving without `amount` grants the full request. Admin only.
    pub async fn override_claim(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
        approved: bool,
        amount: Option<Amount>,
    ) -> Result<Claim, ClaimError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, WriteTarget::Claim(claim_id))?;
        self.require_admin(caller).await?;
        let claim = self.get_claim(claim_id).await?;
        let plan = OverridePlan::build(&claim, approved, amount)?;

        self.write("override_claim", Some(claim_id), || {
            self.ledger.override_claim(caller, claim_id, plan.approved, plan.amount)
        })
        .await?;

        self.get_claim(claim_id).await
    }

    /// Pays out an approved claim. Admin only.
    pub async fn execute_payout(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
    ) -> Result<Claim, ClaimError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, WriteTarget::Claim(claim_id))?;
        self.require_admin(caller).await?;
        let claim = self.get_claim(claim_id).await?;
        require_transition(claim.status, ClaimOperation::Payout)?;

        self.write("execute_payout", Some(claim_id), || {
            self.ledger.execute_payout(caller, claim_id)
        })
        .await?;

        info!(claim_id = %claim_id, amount = %claim.approved_amount, "Payout executed");
        self.get_claim(claim_id).await
    }

    // ========================================================================
    // Configuration and treasury
    // ========================================================================

    /// Replaces the approval threshold. Admin only.
    pub async fn set_threshold(
        &self,
        caller: &AccountAddress,
        threshold: Threshold,
    ) -> Result<(), ClaimError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, WriteTarget::Threshold)?;
        self.require_admin(caller).await?;
        self.write("set_threshold", None, || self.ledger.set_threshold(caller, threshold))
            .await
    }

    /// Hands administrative rights to another identity. Admin only.
    pub async fn transfer_ownership(
        &self,
        caller: &AccountAddress,
        new_owner: AccountAddress,
    ) -> Result<(), ClaimError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, WriteTarget::Ownership)?;
        self.require_admin(caller).await?;
        self.write("transfer_ownership", None, || {
            self.ledger.transfer_ownership(caller, new_owner.clone())
        })
        .await
    }

    /// Adds funds to the treasury
    pub async fn deposit(&self, caller: &AccountAddress, amount: Amount) -> Result<(), ClaimError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, WriteTarget::Treasury)?;
        if amount.is_zero() {
            return Err(ClaimError::invalid_amount("deposit must be greater than zero"));
        }
        self.write("deposit", None, || self.ledger.deposit(caller, amount)).await
    }

    /// Withdraws treasury funds. Admin only.
    pub async fn withdraw(&self, caller: &AccountAddress, amount: Amount) -> Result<(), ClaimError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, caller, WriteTarget::Treasury)?;
        self.require_admin(caller).await?;
        if amount.is_zero() {
            return Err(ClaimError::invalid_amount("withdrawal must be greater than zero"));
        }
        let balance = self.ledger.balance().await?;
        if amount > balance {
            return Err(ClaimError::invalid_amount(format!(
                "withdrawal {} exceeds treasury balance {}",
                amount, balance
            )));
        }
        self.write("withdraw", None, || self.ledger.withdraw(caller, amount)).await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Retrieves a claim from the ledger
    pub async fn get_claim(&self, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        self.ledger
            .get_claim(claim_id)
            .await
            .map_err(|e| ClaimError::from_port(e, Some(claim_id)))
    }

    /// Claims of one policyholder, newest first
    pub async fn list_claims_for(&self, policyholder: &AccountAddress) -> Result<Vec<Claim>, ClaimError> {
        let mut claims = self.ledger.list_claims_for(policyholder).await?;
        sort_newest_first(&mut claims);
        Ok(claims)
    }

    /// Every claim on the ledger, newest first
    pub async fn list_all_claims(&self) -> Result<Vec<Claim>, ClaimError> {
        let mut claims = self.ledger.list_all_claims().await?;
        sort_newest_first(&mut claims);
        Ok(claims)
    }

    /// Current approval threshold
    pub async fn threshold(&self) -> Result<Threshold, ClaimError> {
        Ok(self.ledger.threshold().await?)
    }

    /// Current treasury balance
    pub async fn balance(&self) -> Result<Amount, ClaimError> {
        Ok(self.ledger.balance().await?)
    }

    /// Ledger event log
    pub async fn events(&self) -> Result<Vec<ClaimEvent>, ClaimError> {
        Ok(self.ledger.events().await?)
    }

    /// Last cached snapshot
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Cached snapshot, read from the ledger first if it was never filled
    pub async fn current_snapshot(&self) -> Result<DashboardSnapshot, ClaimError> {
        let cached = self.snapshot().await;
        if cached.refreshed_at.is_some() {
            return Ok(cached);
        }
        self.refresh().await
    }

    /// Re-reads claims, threshold, balance, claim count and owner from the ledger
    ///
    /// Refreshes run one at a time so the cache always ends on the latest read.
    pub async fn refresh(&self) -> Result<DashboardSnapshot, ClaimError> {
        let mut cached = self.snapshot.write().await;

        let mut claims = self.ledger.list_all_claims().await?;
        sort_newest_first(&mut claims);
        let snapshot = DashboardSnapshot {
            claims,
            threshold: self.ledger.threshold().await?,
            balance: self.ledger.balance().await?,
            total_claims: self.ledger.total_claims().await?,
            owner: Some(self.ledger.owner().await?),
            refreshed_at: Some(Utc::now()),
        };

        *cached = snapshot.clone();
        debug!(claims = snapshot.claims.len(), "Snapshot refreshed");
        Ok(snapshot)
    }

    /// Issues one ledger write and refreshes the cache afterwards
    async fn write<T, F, Fut>(
        &self,
        operation: &'static str,
        claim_id: Option<ClaimId>,
        call: F,
    ) -> Result<T, ClaimError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, PortError>>,
    {
        let outcome = call().await;

        if let Err(e) = self.refresh().await {
            warn!(operation, error = %e, "Refresh after write failed");
        }

        outcome.map_err(|e| {
            warn!(operation, error = %e, "Ledger write failed");
            ClaimError::from_port(e, claim_id)
        })
    }
}
