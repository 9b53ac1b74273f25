//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::env;
use std::time::Duration;

use alloy::primitives::Address;

use crate::error::AppError;
use crate::ethereum::constants::ENS_REGISTRY_ADDRESS;

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Logging level (default: info).
    pub log_level: String,
    /// Upper bound for a single RPC round trip.
    pub request_timeout: Duration,
    /// ENS registry used to resolve human-readable names.
    pub ens_registry: Address,
}

impl Config {
    /// Configuration for `rpc_url` with every optional setting at its default.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            log_level: "info".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ens_registry: ENS_REGISTRY_ADDRESS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ETHEREUM_RPC_URL`: Ethereum JSON-RPC endpoint (may embed an access key)
    ///
    /// Optional environment variables:
    /// - `LOG_LEVEL`: Logging level (default: info)
    /// - `RPC_TIMEOUT_SECS`: Per-call timeout in seconds (default: 30)
    /// - `ENS_REGISTRY_ADDRESS`: ENS registry contract (default: mainnet registry)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let rpc_url = env::var("ETHEREUM_RPC_URL").map_err(|_| {
            AppError::Config("ETHEREUM_RPC_URL environment variable not set".into())
        })?;

        let mut config = Self::new(rpc_url);

        if let Ok(level) = env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(raw) = env::var("RPC_TIMEOUT_SECS") {
            config.request_timeout = parse_timeout_secs(&raw)?;
        }

        if let Ok(raw) = env::var("ENS_REGISTRY_ADDRESS") {
            config.ens_registry = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("ENS_REGISTRY_ADDRESS is not an address: {raw}"))
            })?;
        }

        Ok(config)
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AppError::Config(format!(
            "RPC_TIMEOUT_SECS must be a positive number of seconds, got '{raw}'"
        ))),
    }
}
