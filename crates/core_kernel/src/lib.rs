//! Core Kernel - Foundational types shared by the claims dashboard crates
//!
//! This crate provides the fundamental building blocks used across all modules:
//! - Ledger amounts held exactly in the smallest unit
//! - Claim identifiers and wallet addresses
//! - Port error and health types for adapters to the external ledger

pub mod money;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Amount, MoneyError, ETHER_DECIMALS};
pub use identifiers::{AccountAddress, ClaimId, IdentifierError};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
