//! Ledger Infrastructure Layer
//!
//! This crate provides the ledger side of the claims dashboard. The
//! production ledger is an external program; `InMemoryLedger` enforces the
//! same rules in process so that the service and the HTTP interface can run
//! and be tested without one.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_ledger::InMemoryLedger;
//! use domain_claims::ClaimsService;
//! use std::sync::Arc;
//!
//! let ledger = Arc::new(InMemoryLedger::new(owner).with_balance(Amount::parse_ether("10")?));
//! let service = ClaimsService::new(ledger);
//! ```

pub mod clock;
pub mod error;
pub mod ledger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::LedgerError;
pub use ledger::InMemoryLedger;
