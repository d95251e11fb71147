//! Settings DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SetThresholdRequest {
    #[validate(range(max = 100))]
    pub threshold: u16,
}

#[derive(Debug, Serialize)]
pub struct ThresholdResponse {
    pub threshold: u8,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransferOwnershipRequest {
    /// Wallet address receiving administrative rights
    #[validate(length(min = 1, max = 128))]
    pub new_owner: String,
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub owner: String,
    pub owner_short: String,
}
