//! Claims Ledger Port
//!
//! The external ledger program owns every claim, the threshold, and the
//! treasury. This module defines the capability interface the dashboard
//! consumes, so that the domain never depends on a particular ledger client.
//!
//! # Architecture
//!
//! - **In-process adapter**: `infra_ledger::InMemoryLedger`, enforcing the
//!   ledger's rules locally for development and tests
//! - **Mock adapter**: records calls and injects failures for unit tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::ports::ClaimsLedgerPort;
//! use std::sync::Arc;
//!
//! let ledger: Arc<dyn ClaimsLedgerPort> = Arc::new(InMemoryLedger::new(owner));
//! let service = ClaimsService::new(ledger);
//! ```
//!
//! Every write carries the caller identity the ledger verified. Admin-only
//! writes fail with `PortError::Unauthorized` for anyone but the owner.

use async_trait::async_trait;

use core_kernel::{AccountAddress, Amount, ClaimId, DomainPort, HealthCheckable, PortError};

use crate::claim::Claim;
use crate::events::ClaimEvent;
use crate::payout::{FraudScore, Threshold};

/// Capability interface of the external claims ledger
#[async_trait]
pub trait ClaimsLedgerPort: DomainPort + HealthCheckable {
    // ========================================================================
    // Claim writes
    // ========================================================================

    /// Creates a Pending claim and returns its ledger-assigned id
    async fn submit_claim(
        &self,
        caller: &AccountAddress,
        requested_amount: Amount,
        document_reference: String,
    ) -> Result<ClaimId, PortError>;

    /// Records a scored review; approves when `approved_amount` is non-zero
    ///
    /// Admin only.
    async fn review_claim(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
        fraud_score: FraudScore,
        approved_amount: Amount,
    ) -> Result<(), PortError>;

    /// Records a manual decision that bypasses the fraud score
    ///
    /// Admin only.
    async fn override_claim(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
        approved: bool,
        amount: Amount,
    ) -> Result<(), PortError>;

    /// Pays an approved claim out of the treasury
    ///
    /// Admin only.
    async fn execute_payout(
        &self,
        caller: &AccountAddress,
        claim_id: ClaimId,
    ) -> Result<(), PortError>;

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Replaces the approval threshold. Admin only.
    async fn set_threshold(
        &self,
        caller: &AccountAddress,
        threshold: Threshold,
    ) -> Result<(), PortError>;

    /// Current approval threshold
    async fn threshold(&self) -> Result<Threshold, PortError>;

    /// Identity holding administrative rights
    async fn owner(&self) -> Result<AccountAddress, PortError>;

    /// Hands administrative rights to `new_owner`. Admin only.
    async fn transfer_ownership(
        &self,
        caller: &AccountAddress,
        new_owner: AccountAddress,
    ) -> Result<(), PortError>;

    // ========================================================================
    // Queries
    // ========================================================================

    /// Retrieves a claim by id
    async fn get_claim(&self, claim_id: ClaimId) -> Result<Claim, PortError>;

    /// Claims submitted by `policyholder`
    async fn list_claims_for(&self, policyholder: &AccountAddress) -> Result<Vec<Claim>, PortError>;

    /// Every claim on the ledger
    async fn list_all_claims(&self) -> Result<Vec<Claim>, PortError>;

    /// Number of claims ever submitted
    async fn total_claims(&self) -> Result<u64, PortError>;

    /// Events recorded since the ledger was created
    async fn events(&self) -> Result<Vec<ClaimEvent>, PortError>;

    // ========================================================================
    // Treasury
    // ========================================================================

    /// Funds held for payouts
    async fn balance(&self) -> Result<Amount, PortError>;

    /// Adds funds to the treasury
    async fn deposit(&self, caller: &AccountAddress, amount: Amount) -> Result<(), PortError>;

    /// Removes funds from the treasury. Admin only.
    async fn withdraw(&self, caller: &AccountAddress, amount: Amount) -> Result<(), PortError>;
}

/// Mock implementation of ClaimsLedgerPort for testing
///
/// Stores claims in memory, counts writes, and can be told to fail the next
/// write. Only the owner check and the transition table are enforced.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::{Notify, RwLock};

    use core_kernel::HealthCheckResult;
    use crate::lifecycle::ClaimLifecycle;

    #[derive(Debug, Default)]
    struct MockState {
        claims: BTreeMap<ClaimId, Claim>,
        threshold: Threshold,
        balance: Amount,
        next_id: u64,
    }

    /// In-memory mock implementation of ClaimsLedgerPort
    #[derive(Debug)]
    pub struct MockLedgerPort {
        owner: RwLock<AccountAddress>,
        state: RwLock<MockState>,
        writes: AtomicUsize,
        reads: AtomicUsize,
        fail_next_write: AtomicBool,
        hold_writes: AtomicBool,
        release: Arc<Notify>,
    }

    impl MockLedgerPort {
        /// Creates a mock port administered by `owner`
        pub fn new(owner: AccountAddress) -> Self {
            Self {
                owner: RwLock::new(owner),
                state: RwLock::new(MockState::default()),
                writes: AtomicUsize::new(0),
                reads: AtomicUsize::new(0),
                fail_next_write: AtomicBool::new(false),
                hold_writes: AtomicBool::new(false),
                release: Arc::new(Notify::new()),
            }
        }

        /// Inserts a claim as if it had been submitted earlier
        pub async fn seed(&self, claim: Claim) {
            let mut state = self.state.write().await;
            state.next_id = state.next_id.max(claim.id.value() + 1);
            state.claims.insert(claim.id, claim);
        }

        /// Sets the treasury balance
        pub async fn fund(&self, amount: Amount) {
            self.state.write().await.balance = amount;
        }

        /// Number of write calls that reached the port
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Number of read calls that reached the port
        pub fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        /// Makes the next write fail with a connection error
        pub fn fail_next_write(&self) {
            self.fail_next_write.store(true, Ordering::SeqCst);
        }

        /// Makes writes wait until [`MockLedgerPort::release_writes`]
        pub fn hold_writes(&self) {
            self.hold_writes.store(true, Ordering::SeqCst);
        }

        /// Lets held writes complete
        pub fn release_writes(&self) {
            self.hold_writes.store(false, Ordering::SeqCst);
            self.release.notify_waiters();
        }

        async fn begin_write(&self) -> Result<(), PortError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            while self.hold_writes.load(Ordering::SeqCst) {
                let notified = self.release.notified();
                if !self.hold_writes.load(Ordering::SeqCst) {
                    break;
                }
                notified.await;
            }
            if self.fail_next_write.swap(false, Ordering::SeqCst) {
                return Err(PortError::connection("injected failure"));
            }
            Ok(())
        }

        async fn require_owner(&self, caller: &AccountAddress) -> Result<(), PortError> {
            if *self.owner.read().await != *caller {
                return Err(PortError::unauthorized("caller is not the owner"));
            }
            Ok(())
        }

        fn read(&self) {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl DomainPort for MockLedgerPort {}

    #[async_trait]
    impl HealthCheckable for MockLedgerPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-ledger", 0)
        }
    }

    #[async_trait]
    impl ClaimsLedgerPort for MockLedgerPort {
        async fn submit_claim(
            &self,
            caller: &AccountAddress,
            requested_amount: Amount,
            document_reference: String,
        ) -> Result<ClaimId, PortError> {
            self.begin_write().await?;
            let mut state = self.state.write().await;
            let id = ClaimId::new(state.next_id);
            state.next_id += 1;
            state.claims.insert(
                id,
                Claim::submitted(id, caller.clone(), requested_amount, Some(document_reference), 0),
            );
            Ok(id)
        }

        async fn review_claim(
            &self,
            caller: &AccountAddress,
            claim_id: ClaimId,
            fraud_score: FraudScore,
            approved_amount: Amount,
        ) -> Result<(), PortError> {
            self.begin_write().await?;
            self.require_owner(caller).await?;
            let mut state = self.state.write().await;
            let claim = state.claims.get_mut(&claim_id)
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
            ClaimLifecycle::review(claim, fraud_score, approved_amount, caller)
                .map_err(|e| PortError::conflict(e.to_string()))
        }

        async fn override_claim(
            &self,
            caller: &AccountAddress,
            claim_id: ClaimId,
            approved: bool,
            amount: Amount,
        ) -> Result<(), PortError> {
            self.begin_write().await?;
            self.require_owner(caller).await?;
            let mut state = self.state.write().await;
            let claim = state.claims.get_mut(&claim_id)
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
            ClaimLifecycle::decide(claim, approved, amount, caller)
                .map_err(|e| PortError::conflict(e.to_string()))
        }

        async fn execute_payout(
            &self,
            caller: &AccountAddress,
            claim_id: ClaimId,
        ) -> Result<(), PortError> {
            self.begin_write().await?;
            self.require_owner(caller).await?;
            let mut state = self.state.write().await;
            let claim = state.claims.get_mut(&claim_id)
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
            ClaimLifecycle::payout(claim).map_err(|e| PortError::conflict(e.to_string()))
        }

        async fn set_threshold(
            &self,
            caller: &AccountAddress,
            threshold: Threshold,
        ) -> Result<(), PortError> {
            self.begin_write().await?;
            self.require_owner(caller).await?;
            self.state.write().await.threshold = threshold;
            Ok(())
        }

        async fn threshold(&self) -> Result<Threshold, PortError> {
            self.read();
            Ok(self.state.read().await.threshold)
        }

        async fn owner(&self) -> Result<AccountAddress, PortError> {
            self.read();
            Ok(self.owner.read().await.clone())
        }

        async fn transfer_ownership(
            &self,
            caller: &AccountAddress,
            new_owner: AccountAddress,
        ) -> Result<(), PortError> {
            self.begin_write().await?;
            self.require_owner(caller).await?;
            *self.owner.write().await = new_owner;
            Ok(())
        }

        async fn get_claim(&self, claim_id: ClaimId) -> Result<Claim, PortError> {
            self.read();
            self.state.read().await.claims.get(&claim_id).cloned()
                .ok_or_else(|| PortError::not_found("Claim", claim_id))
        }

        async fn list_claims_for(&self, policyholder: &AccountAddress) -> Result<Vec<Claim>, PortError> {
            self.read();
            Ok(self.state.read().await.claims.values()
                .filter(|c| c.policyholder == *policyholder)
                .cloned()
                .collect())
        }

        async fn list_all_claims(&self) -> Result<Vec<Claim>, PortError> {
            self.read();
            Ok(self.state.read().await.claims.values().cloned().collect())
        }

        async fn total_claims(&self) -> Result<u64, PortError> {
            self.read();
            Ok(self.state.read().await.next_id)
        }

        async fn events(&self) -> Result<Vec<ClaimEvent>, PortError> {
            self.read();
            Ok(Vec::new())
        }

        async fn balance(&self) -> Result<Amount, PortError> {
            self.read();
            Ok(self.state.read().await.balance)
        }

        async fn deposit(&self, _caller: &AccountAddress, amount: Amount) -> Result<(), PortError> {
            self.begin_write().await?;
            let mut state = self.state.write().await;
            state.balance = state.balance.checked_add(amount)
                .map_err(|e| PortError::validation(e.to_string()))?;
            Ok(())
        }

        async fn withdraw(&self, caller: &AccountAddress, amount: Amount) -> Result<(), PortError> {
            self.begin_write().await?;
            self.require_owner(caller).await?;
            let mut state = self.state.write().await;
            state.balance = state.balance.checked_sub(amount)
                .map_err(|_| PortError::conflict("insufficient balance"))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::MockLedgerPort;
    use crate::claim::ClaimStatus;

    fn owner() -> AccountAddress {
        AccountAddress::new("0xad00000000000000000000000000000000000001").unwrap()
    }

    fn holder() -> AccountAddress {
        AccountAddress::new("0x1111111111111111111111111111111111111111").unwrap()
    }

    #[tokio::test]
    async fn test_mock_port_submit_and_get() {
        let port = MockLedgerPort::new(owner());
        let id = port.submit_claim(&holder(), Amount::from_units(10), "doc".into()).await.unwrap();

        let claim = port.get_claim(id).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.policyholder, holder());
        assert_eq!(port.write_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_port_admin_only() {
        let port = MockLedgerPort::new(owner());
        let id = port.submit_claim(&holder(), Amount::from_units(10), "doc".into()).await.unwrap();

        let err = port.execute_payout(&holder(), id).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_mock_port_injected_failure() {
        let port = MockLedgerPort::new(owner());
        port.fail_next_write();
        let err = port.deposit(&holder(), Amount::from_units(1)).await.unwrap_err();
        assert!(err.is_transient());
        assert!(port.deposit(&holder(), Amount::from_units(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_port_not_found() {
        let port = MockLedgerPort::new(owner());
        let result = port.get_claim(ClaimId::new(99)).await;
        assert!(result.unwrap_err().is_not_found());
    }
}
