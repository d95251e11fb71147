//! API configuration

use serde::Deserialize;

use core_kernel::{AccountAddress, Amount, CoreError};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Log level
    pub log_level: String,
    /// Owner of the development ledger
    pub ledger_owner: String,
    /// Approval threshold the development ledger starts with
    pub fraud_score_threshold: u16,
    /// Treasury the development ledger starts with, in whole ether
    pub treasury_balance: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            log_level: "info".to_string(),
            ledger_owner: "0x0000000000000000000000000000000000000001".to_string(),
            fraud_score_threshold: 70,
            treasury_balance: "0".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    ///
    /// Unset variables keep their [`Default`] values.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiration_secs", defaults.jwt_expiration_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("ledger_owner", defaults.ledger_owner)?
            .set_default("fraud_score_threshold", i64::from(defaults.fraud_score_threshold))?
            .set_default("treasury_balance", defaults.treasury_balance)?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured ledger owner
    pub fn ledger_owner(&self) -> Result<AccountAddress, CoreError> {
        AccountAddress::new(&self.ledger_owner)
            .map_err(|e| CoreError::configuration(format!("ledger_owner: {}", e)))
    }

    /// Parses the configured initial treasury
    pub fn treasury_balance(&self) -> Result<Amount, CoreError> {
        Amount::parse_ether(&self.treasury_balance)
            .map_err(|e| CoreError::configuration(format!("treasury_balance: {}", e)))
    }
}
