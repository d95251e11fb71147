//! Treasury DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::Amount;

#[derive(Debug, Deserialize, Validate)]
pub struct TreasuryRequest {
    /// Whole ether as decimal text
    #[validate(length(min = 1, max = 80))]
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: Amount,
    pub balance_display: String,
}

impl From<Amount> for BalanceResponse {
    fn from(balance: Amount) -> Self {
        Self {
            balance,
            balance_display: balance.format_ether(),
        }
    }
}
