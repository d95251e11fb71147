//! Claims Domain
//!
//! This crate implements the claim lifecycle of the insurance dashboard: the
//! status machine, the fraud-score payout curve, review planning, and the
//! service that drives claims through the external ledger.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Pending --approve--> Approved --payout--> PaidOut
//!    |
//!    +------deny-----> Denied
//! ```
//!
//! Denied and PaidOut are terminal. Every transition is recorded by the
//! ledger; this crate validates requests locally so that doomed writes are
//! never sent.

pub mod claim;
pub mod payout;
pub mod lifecycle;
pub mod review;
pub mod events;
pub mod ports;
pub mod services;
pub mod view;
pub mod error;

pub use claim::{Claim, ClaimStatus};
pub use payout::{FraudScore, PayoutCalculator, Threshold};
pub use lifecycle::{transition, require_transition, ClaimLifecycle, ClaimOperation};
pub use review::{OverridePlan, ReviewPlan, Submission, Suggestion};
pub use events::ClaimEvent;
pub use ports::ClaimsLedgerPort;
pub use services::{ClaimsService, DashboardSnapshot, WriteTarget};
pub use view::{sort_newest_first, views_newest_first, ClaimView};
pub use error::ClaimError;
