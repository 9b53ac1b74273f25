//! Minimal ERC-20 read interface.

use super::interface::ContractInterface;
use crate::error::Result;

/// Read-only subset of the ERC-20 interface.
pub const ERC20_READ_SIGNATURES: &[&str] = &[
    "function name() view returns (string)",
    "function symbol() view returns (string)",
    "function decimals() view returns (uint8)",
    "function totalSupply() view returns (uint256)",
    "function balanceOf(address owner) view returns (uint256)",
];

impl ContractInterface {
    /// The minimal ERC-20 interface (name, symbol, decimals, totalSupply, balanceOf).
    pub fn erc20() -> Result<Self> {
        Self::parse(ERC20_READ_SIGNATURES)
    }
}
