//! Ethereum network constants.
//!
//! Contains chain IDs, unit scales and well-known contract addresses.

use alloy::primitives::{address, Address};

// ============================================================================
// Chain IDs
// ============================================================================

/// Ethereum Mainnet chain ID.
pub const ETHEREUM_MAINNET_CHAIN_ID: u64 = 1;

/// Sepolia testnet chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Holesky testnet chain ID.
pub const HOLESKY_CHAIN_ID: u64 = 17000;

/// Local development chain ID (Anvil, Hardhat).
pub const DEVNET_CHAIN_ID: u64 = 31337;

/// Names of well-known networks, keyed by chain ID.
const KNOWN_NETWORKS: &[(u64, &str)] = &[
    (ETHEREUM_MAINNET_CHAIN_ID, "mainnet"),
    (SEPOLIA_CHAIN_ID, "sepolia"),
    (HOLESKY_CHAIN_ID, "holesky"),
    (10, "optimism"),
    (56, "bnb"),
    (137, "matic"),
    (8453, "base"),
    (42161, "arbitrum"),
    (DEVNET_CHAIN_ID, "devnet"),
];

/// Human-readable name of a chain, `"unknown"` if it is not a well-known one.
pub fn network_name(chain_id: u64) -> &'static str {
    KNOWN_NETWORKS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| *name)
        .unwrap_or("unknown")
}

// ============================================================================
// Units
// ============================================================================

/// Decimals of the native currency (1 ether = 10^18 wei).
pub const ETHER_DECIMALS: u8 = 18;

/// Decimals of gwei relative to wei.
pub const GWEI_DECIMALS: u8 = 9;

// ============================================================================
// Name Service
// ============================================================================

/// ENS registry address (same deployment on Mainnet, Sepolia and Holesky).
pub const ENS_REGISTRY_ADDRESS: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");
