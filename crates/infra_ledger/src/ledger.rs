//! In-process claims ledger
//!
//! `InMemoryLedger` implements [`ClaimsLedgerPort`] with the rules of the
//! external claims program:
//!
//! - Review, override, payout, threshold, withdrawal and ownership writes
//!   are owner only
//! - Claim ids come from a counter starting at 0
//! - Status moves go through the shared transition table
//! - Payouts and withdrawals draw on the treasury and fail when it is short
//! - Every successful write appends to the event log
//!
//! A failed write leaves the state exactly as it was.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use core_kernel::{
    AccountAddress, Amount, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
use domain_claims::{
    require_transition, Claim, ClaimEvent, ClaimLifecycle, ClaimOperation, ClaimsLedgerPort,
    FraudScore, Threshold,
};

use crate::clock::{Clock, SystemClock};
use crate::error::LedgerError;

#[derive(Debug)]
struct LedgerState {
    owner: AccountAddress,
    /// Indexed by claim id
    claims: Vec<Claim>,
    threshold: Threshold,
    balance: Amount,
    events: Vec<ClaimEvent>,
}

impl LedgerState {
    fn require_owner(&self, caller: &AccountAddress) -> Result<(), LedgerError> {
        if self.owner != *caller {
            return Err(LedgerError::NotOwner(caller.clone()));
        }
        Ok(())
    }

    fn claim_mut(&mut self, claim_id: ClaimId) -> Result<&mut Claim, LedgerError> {
        usize::try_from(claim_id.value())
            .ok()
            .and_then(|index| self.claims.get_mut(index))
            .ok_or(LedgerError::ClaimNotFound(claim_id))
    }

    fn claim(&self, claim_id: ClaimId) -> Result<&Claim, LedgerError> {
        usize::try_from(claim_id.value())
            .ok()
            .and_then(|index| self.claims.get(index))
            .ok_or(LedgerError::ClaimNotFound(claim_id))
    }
}

/// How long a health check waits for the state lock
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(1);

/// In-memory implementation of the claims ledger
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
    clock: Arc<dyn Clock>,
    health_timeout: Duration,
}

impl InMemoryLedger {
    /// Creates an empty ledger administered by `owner`
    pub fn new(owner: AccountAddress) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                owner,
                claims: Vec::new(),
                threshold: Threshold::DEFAULT,
                balance: Amount::ZERO,
                events: Vec::new(),
            }),
            clock: Arc::new(SystemClock),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    /// Uses `clock` for claim timestamps and event times
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Starts with the given approval threshold
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.state.get_mut().threshold = threshold;
        self
    }

    /// Reports unhealthy when the state lock is not free within `timeout`
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Starts with funds already in the treasury
    pub fn with_balance(mut self, balance: Amount) -> Self {
        self.state.get_mut().balance = balance;
        self
    }

    fn block_time(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    async fn submit(
        &self,
        caller: &AccountAddress,
        requested_amount: Amount,
        document_reference: String,
    ) -> Result<ClaimId, LedgerError> {
        if requested_amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }

        let now = self.block_time();
        let mut state = self.state.write().await;
        let claim_id = ClaimId::new(state.claims.len() as u64);
        let timestamp = u64::try_from(now.timestamp()).unwrap_or_default();

        state.claims.push(Claim::submitted(
            claim_id,
            caller.clone(),
            requested_amount,
            Some(document_reference),
            timestamp,
        ));
        state.events.push(ClaimEvent::ClaimSubmitted {
            claim_id,
            policyholder: caller.clone(),
            requested_amount,
            timestamp: now,
        });
        Ok(claim_id)
    }

    async fn review(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
        fraud_score: FraudScore,
        approved_amount: Amount,
    ) -> Result<(), LedgerError> {
        let now = self.block_time();
        let mut state = self.state.write().await;
        state.require_owner(caller)?;

        let claim = state.claim_mut(claim_id)?;
        ClaimLifecycle::review(claim, fraud_score, approved_amount, caller)?;
        let status = claim.status;

        state.events.push(ClaimEvent::ClaimVerified {
            claim_id,
            fraud_score,
            approved_amount,
            timestamp: now,
        });
        state.events.push(ClaimEvent::ClaimStatusUpdated { claim_id, status, timestamp: now });
        Ok(())
    }

    async fn decide(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
        approved: bool,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let now = self.block_time();
        let mut state = self.state.write().await;
        state.require_owner(caller)?;

        let claim = state.claim_mut(claim_id)?;
        ClaimLifecycle::decide(claim, approved, amount, caller)?;
        let status = claim.status;

        state.events.push(ClaimEvent::ClaimStatusUpdated { claim_id, status, timestamp: now });
        Ok(())
    }

    async fn payout(&self, caller: &AccountAddress, claim_id: ClaimId) -> Result<(), LedgerError> {
        let now = self.block_time();
        let mut state = self.state.write().await;
        state.require_owner(caller)?;

        let claim = state.claim(claim_id)?;
        require_transition(claim.status, ClaimOperation::Payout)?;
        let amount = claim.approved_amount;
        let policyholder = claim.policyholder.clone();

        let available = state.balance;
        let remaining = available
            .checked_sub(amount)
            .map_err(|_| LedgerError::InsufficientBalance { needed: amount, available })?;

        let claim = state.claim_mut(claim_id)?;
        ClaimLifecycle::payout(claim)?;
        let status = claim.status;
        state.balance = remaining;

        state.events.push(ClaimEvent::PayoutExecuted {
            claim_id,
            policyholder,
            amount,
            timestamp: now,
        });
        state.events.push(ClaimEvent::ClaimStatusUpdated { claim_id, status, timestamp: now });
        Ok(())
    }

    async fn update_threshold(
        &self,
        caller: &AccountAddress,
        threshold: Threshold,
    ) -> Result<(), LedgerError> {
        let now = self.block_time();
        let mut state = self.state.write().await;
        state.require_owner(caller)?;

        state.threshold = threshold;
        state.events.push(ClaimEvent::FraudScoreThresholdUpdated {
            new_threshold: threshold,
            timestamp: now,
        });
        Ok(())
    }

    async fn change_owner(
        &self,
        caller: &AccountAddress,
        new_owner: AccountAddress,
    ) -> Result<(), LedgerError> {
        let now = self.block_time();
        let mut state = self.state.write().await;
        state.require_owner(caller)?;

        let previous_owner = std::mem::replace(&mut state.owner, new_owner.clone());
        state.events.push(ClaimEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
            timestamp: now,
        });
        Ok(())
    }

    async fn credit(&self, caller: &AccountAddress, amount: Amount) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }

        let now = self.block_time();
        let mut state = self.state.write().await;
        state.balance = state.balance.checked_add(amount).map_err(|_| LedgerError::Overflow)?;
        state.events.push(ClaimEvent::FundsDeposited {
            from: caller.clone(),
            amount,
            timestamp: now,
        });
        Ok(())
    }

    async fn debit(&self, caller: &AccountAddress, amount: Amount) -> Result<(), LedgerError> {
        let now = self.block_time();
        let mut state = self.state.write().await;
        state.require_owner(caller)?;
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }

        let available = state.balance;
        state.balance = available
            .checked_sub(amount)
            .map_err(|_| LedgerError::InsufficientBalance { needed: amount, available })?;
        state.events.push(ClaimEvent::FundsWithdrawn {
            to: caller.clone(),
            amount,
            timestamp: now,
        });
        Ok(())
    }
}

/// Logs the outcome of a write and converts its error for the port
fn settle<T>(operation: &'static str, result: Result<T, LedgerError>) -> Result<T, PortError> {
    match &result {
        Ok(_) => debug!(operation, "Ledger write applied"),
        Err(e) if e.is_unauthorized() => warn!(operation, error = %e, "Ledger write refused"),
        Err(e) => info!(operation, error = %e, "Ledger write reverted"),
    }
    result.map_err(PortError::from)
}

const ADAPTER_ID: &str = "in-memory-ledger";

impl DomainPort for InMemoryLedger {}

#[async_trait]
impl HealthCheckable for InMemoryLedger {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let acquired = tokio::time::timeout(self.health_timeout, self.state.read()).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match acquired {
            Ok(_state) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(_) => {
                warn!(timeout_ms = self.health_timeout.as_millis() as u64, "Ledger state lock busy");
                HealthCheckResult::unhealthy(
                    ADAPTER_ID,
                    latency_ms,
                    format!("state lock not acquired within {}ms", self.health_timeout.as_millis()),
                )
            }
        }
    }
}

#[async_trait]
impl ClaimsLedgerPort for InMemoryLedger {
    async fn submit_claim(
        &self,
        caller: &AccountAddress,
        requested_amount: Amount,
        document_reference: String,
    ) -> Result<ClaimId, PortError> {
        settle("submit_claim", self.submit(caller, requested_amount, document_reference).await)
    }

    async fn review_claim(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
        fraud_score: FraudScore,
        approved_amount: Amount,
    ) -> Result<(), PortError> {
        settle("review_claim", self.review(caller, claim_id, fraud_score, approved_amount).await)
    }

    async fn override_claim(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
        approved: bool,
        amount: Amount,
    ) -> Result<(), PortError> {
        settle("override_claim", self.decide(caller, claim_id, approved, amount).await)
    }

    async fn execute_payout(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
    ) -> Result<(), PortError> {
        settle("execute_payout", self.payout(caller, claim_id).await)
    }

    async fn set_threshold(
        &self,
        caller: &AccountAddress,
        threshold: Threshold,
    ) -> Result<(), PortError> {
        settle("set_threshold", self.update_threshold(caller, threshold).await)
    }

    async fn threshold(&self) -> Result<Threshold, PortError> {
        Ok(self.state.read().await.threshold)
    }

    async fn owner(&self) -> Result<AccountAddress, PortError> {
        Ok(self.state.read().await.owner.clone())
    }

    async fn transfer_ownership(
        &self,
        caller: &AccountAddress,
        new_owner: AccountAddress,
    ) -> Result<(), PortError> {
        settle("transfer_ownership", self.change_owner(caller, new_owner).await)
    }

    async fn get_claim(&self, claim_id: ClaimId) -> Result<Claim, PortError> {
        let state = self.state.read().await;
        Ok(state.claim(claim_id)?.clone())
    }

    async fn list_claims_for(&self, policyholder: &AccountAddress) -> Result<Vec<Claim>, PortError> {
        let state = self.state.read().await;
        Ok(state
            .claims
            .iter()
            .filter(|c| c.policyholder == *policyholder)
            .cloned()
            .collect())
    }

    async fn list_all_claims(&self) -> Result<Vec<Claim>, PortError> {
        Ok(self.state.read().await.claims.clone())
    }

    async fn total_claims(&self) -> Result<u64, PortError> {
        Ok(self.state.read().await.claims.len() as u64)
    }

    async fn events(&self) -> Result<Vec<ClaimEvent>, PortError> {
        Ok(self.state.read().await.events.clone())
    }

    async fn balance(&self) -> Result<Amount, PortError> {
        Ok(self.state.read().await.balance)
    }

    async fn deposit(&self, caller: &AccountAddress, amount: Amount) -> Result<(), PortError> {
        settle("deposit", self.credit(caller, amount).await)
    }

    async fn withdraw(&self, caller: &AccountAddress, amount: Amount) -> Result<(), PortError> {
        settle("withdraw", self.debit(caller, amount).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use core_kernel::AdapterHealth;
    use domain_claims::ClaimStatus;

    fn owner() -> AccountAddress {
        AccountAddress::new("0xad00000000000000000000000000000000000001").unwrap()
    }

    fn holder() -> AccountAddress {
        AccountAddress::new("0x1111111111111111111111111111111111111111").unwrap()
    }

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::new(owner())
            .with_clock(Arc::new(FixedClock::at_unix(1_700_000_000)))
            .with_balance(Amount::from_units(10_000))
    }

    #[tokio::test]
    async fn test_ids_start_at_zero() {
        let ledger = ledger();
        let first = ledger.submit_claim(&holder(), Amount::from_units(1), "a".into()).await.unwrap();
        let second = ledger.submit_claim(&holder(), Amount::from_units(1), "b".into()).await.unwrap();
        assert_eq!(first, ClaimId::new(0));
        assert_eq!(second, ClaimId::new(1));
        assert_eq!(ledger.total_claims().await.unwrap(), 2);

        let claim = ledger.get_claim(first).await.unwrap();
        assert_eq!(claim.timestamp, 1_700_000_000);
        assert_eq!(claim.status, ClaimStatus::Pending);
    }

    #[tokio::test]
    async fn test_payout_requires_balance() {
        let ledger = InMemoryLedger::new(owner()).with_balance(Amount::from_units(50));
        let id = ledger.submit_claim(&holder(), Amount::from_units(100), "doc".into()).await.unwrap();
        ledger.override_claim(&owner(), id, true, Amount::from_units(100)).await.unwrap();

        let err = ledger.execute_payout(&owner(), id).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
        assert_eq!(ledger.get_claim(id).await.unwrap().status, ClaimStatus::Approved);
        assert_eq!(ledger.balance().await.unwrap().units(), 50);
    }

    #[tokio::test]
    async fn test_payout_debits_treasury() {
        let ledger = ledger();
        let id = ledger.submit_claim(&holder(), Amount::from_units(1000), "doc".into()).await.unwrap();
        ledger.review_claim(&owner(), id, FraudScore::new(75).unwrap(), Amount::from_units(500))
            .await
            .unwrap();
        ledger.execute_payout(&owner(), id).await.unwrap();

        assert_eq!(ledger.balance().await.unwrap().units(), 9_500);
        let events = ledger.events().await.unwrap();
        let types: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "ClaimSubmitted",
                "ClaimVerified",
                "ClaimStatusUpdated",
                "PayoutExecuted",
                "ClaimStatusUpdated",
            ]
        );
    }

    #[tokio::test]
    async fn test_non_owner_writes_refused() {
        let ledger = ledger();
        let id = ledger.submit_claim(&holder(), Amount::from_units(1), "doc".into()).await.unwrap();

        assert!(ledger.override_claim(&holder(), id, false, Amount::ZERO).await.unwrap_err().is_unauthorized());
        assert!(ledger.set_threshold(&holder(), Threshold::DEFAULT).await.unwrap_err().is_unauthorized());
        assert!(ledger.withdraw(&holder(), Amount::from_units(1)).await.unwrap_err().is_unauthorized());
        assert!(ledger.transfer_ownership(&holder(), holder()).await.unwrap_err().is_unauthorized());
        assert_eq!(ledger.events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_claim() {
        let ledger = ledger();
        let err = ledger.execute_payout(&owner(), ClaimId::new(7)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_transfer_ownership() {
        let ledger = ledger();
        ledger.transfer_ownership(&owner(), holder()).await.unwrap();
        assert_eq!(ledger.owner().await.unwrap(), holder());
        assert!(ledger.set_threshold(&owner(), Threshold::DEFAULT).await.is_err());
        assert!(ledger.set_threshold(&holder(), Threshold::new(40).unwrap()).await.is_ok());
    }

    #[tokio::test]
    async fn test_zero_deposit_rejected() {
        let ledger = ledger();
        let err = ledger.deposit(&holder(), Amount::ZERO).await.unwrap_err();
        assert!(matches!(err, PortError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_second_transitions_revert_without_side_effects() {
        let ledger = ledger();
        let reviewed = ledger.submit_claim(&holder(), Amount::from_units(1000), "a".into()).await.unwrap();
        let denied = ledger.submit_claim(&holder(), Amount::from_units(1000), "b".into()).await.unwrap();
        let score = FraudScore::new(20).unwrap();

        ledger.review_claim(&owner(), reviewed, score, Amount::from_units(1000)).await.unwrap();
        ledger.override_claim(&owner(), denied, false, Amount::ZERO).await.unwrap();
        ledger.execute_payout(&owner(), reviewed).await.unwrap();
        let balance = ledger.balance().await.unwrap();
        let event_count = ledger.events().await.unwrap().len();

        // a caller holding a stale Pending copy still gets reverted here
        let err = ledger.review_claim(&owner(), reviewed, score, Amount::from_units(1000)).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
        let err = ledger.override_claim(&owner(), denied, true, Amount::from_units(1000)).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
        let err = ledger.execute_payout(&owner(), reviewed).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
        let err = ledger.execute_payout(&owner(), denied).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));

        assert_eq!(ledger.balance().await.unwrap(), balance);
        assert_eq!(balance.units(), 9_000);
        assert_eq!(ledger.events().await.unwrap().len(), event_count);
        assert_eq!(ledger.get_claim(reviewed).await.unwrap().status, ClaimStatus::PaidOut);
        let denied_claim = ledger.get_claim(denied).await.unwrap();
        assert_eq!(denied_claim.status, ClaimStatus::Denied);
        assert!(denied_claim.approved_amount.is_zero());
    }

    #[tokio::test]
    async fn test_health_check_healthy_when_idle() {
        let result = ledger().health_check().await;
        assert_eq!(result.status, AdapterHealth::Healthy);
        assert_eq!(result.adapter_id, "in-memory-ledger");
    }

    #[tokio::test]
    async fn test_health_check_unhealthy_when_lock_held() {
        let ledger = ledger().with_health_timeout(Duration::from_millis(10));
        let _writer = ledger.state.write().await;

        let result = ledger.health_check().await;
        assert_eq!(result.status, AdapterHealth::Unhealthy);
        assert!(result.message.unwrap().contains("10ms"));
    }
}
