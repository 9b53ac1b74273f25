//! Token-related types and unit formatting.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::ethereum::constants::{ETHER_DECIMALS, GWEI_DECIMALS};

/// Token contract state read through the token's interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token contract address.
    pub contract: Address,
    /// Token name (e.g., "Dai Stablecoin").
    pub name: String,
    /// Token symbol (e.g., "DAI").
    pub symbol: String,
    /// Human-readable total supply.
    pub total_supply: String,
    /// Raw total supply in smallest unit.
    pub total_supply_raw: String,
}

/// A holder's token balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderBalance {
    /// The name or address the caller asked about.
    pub requested: String,
    /// Address the request resolved to.
    pub address: Address,
    /// Human-readable balance.
    pub balance: String,
    /// Raw balance in smallest unit.
    pub balance_raw: String,
}

/// Format a U256 value with decimals to a human-readable string.
///
/// The result always carries a fractional part with trailing zeros
/// trimmed down to a single digit: `10^18` at 18 decimals is `"1.0"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let value_str = value.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return format!("{value_str}.0");
    }

    let padded = if value_str.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - value_str.len()), value_str)
    } else {
        value_str
    };

    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{integer}.0")
    } else {
        format!("{integer}.{fraction}")
    }
}

/// Format a wei amount as ether.
pub fn format_ether(value: U256) -> String {
    format_units(value, ETHER_DECIMALS)
}

/// Format a wei amount as gwei.
pub fn format_gwei(value: u128) -> String {
    format_units(U256::from(value), GWEI_DECIMALS)
}
