//! ENS registry and resolver bindings.

use alloy::primitives::{keccak256, B256};

use super::interface::ContractInterface;
use crate::error::Result;

/// Registry lookup of the resolver responsible for a node.
pub const ENS_REGISTRY_SIGNATURES: &[&str] =
    &["function resolver(bytes32 node) view returns (address)"];

/// Resolver lookup of the address a node points to.
pub const ENS_RESOLVER_SIGNATURES: &[&str] =
    &["function addr(bytes32 node) view returns (address)"];

pub fn registry_interface() -> Result<ContractInterface> {
    ContractInterface::parse(ENS_REGISTRY_SIGNATURES)
}

pub fn resolver_interface() -> Result<ContractInterface> {
    ContractInterface::parse(ENS_RESOLVER_SIGNATURES)
}

/// EIP-137 namehash of a dot-separated name.
pub fn namehash(name: &str) -> B256 {
    if name.is_empty() {
        return B256::ZERO;
    }

    name.rsplit('.').fold(B256::ZERO, |node, label| {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(keccak256(label.as_bytes()).as_slice());
        keccak256(buf)
    })
}
