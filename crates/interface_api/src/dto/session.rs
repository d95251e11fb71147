//! Session DTOs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub address: String,
    pub address_short: String,
    pub is_admin: bool,
}
