//! Name resolution service.
//!
//! Turns human-readable names such as `vitalik.eth` into addresses by
//! querying the ENS registry and the resolver it points to.

use std::fmt;
use std::str::FromStr;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, B256},
};
use async_trait::async_trait;

use crate::{
    error::{AppError, Result},
    ethereum::{
        contracts::{ens, ContractInterface},
        ChainReader,
    },
};

/// An account given either as an address or as a name to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    Address(Address),
    Name(String),
}

impl FromStr for AccountRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(AppError::InvalidAddress("Address cannot be empty".to_string()));
        }

        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            return trimmed
                .parse::<Address>()
                .map(AccountRef::Address)
                .map_err(|e| AppError::InvalidAddress(format!("'{trimmed}': {e}")));
        }

        let is_name = trimmed.contains('.')
            && !trimmed.starts_with('.')
            && !trimmed.ends_with('.')
            && !trimmed.contains("..")
            && !trimmed.chars().any(char::is_whitespace);

        if is_name {
            Ok(AccountRef::Name(trimmed.to_lowercase()))
        } else {
            Err(AppError::InvalidAddress(format!(
                "'{trimmed}' is neither a 0x address nor a name like 'vitalik.eth'"
            )))
        }
    }
}

impl From<Address> for AccountRef {
    fn from(address: Address) -> Self {
        AccountRef::Address(address)
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRef::Address(address) => write!(f, "{address}"),
            AccountRef::Name(name) => f.write_str(name),
        }
    }
}

/// Resolves human-readable names to addresses.
///
/// Lets callers swap the name service (or stub it out in tests).
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve `name` to the address it is registered to.
    ///
    /// Fails with [`AppError::AddressResolution`] if nothing is registered.
    async fn resolve_name(&self, name: &str) -> Result<Address>;
}

/// Resolve `account` to a concrete address, looking names up through `resolver`.
pub async fn resolve_account(resolver: &dyn NameResolver, account: &AccountRef) -> Result<Address> {
    match account {
        AccountRef::Address(address) => Ok(*address),
        AccountRef::Name(name) => resolver.resolve_name(name).await,
    }
}

/// ENS-backed resolver issuing read-only calls through a [`ChainReader`].
#[derive(Debug, Clone)]
pub struct EnsResolver {
    reader: ChainReader,
    registry: Address,
    registry_iface: ContractInterface,
    resolver_iface: ContractInterface,
}

impl EnsResolver {
    /// Create a resolver using the registry configured on `reader`.
    pub fn new(reader: ChainReader) -> Result<Self> {
        let registry = reader.ens_registry();
        Ok(Self {
            reader,
            registry,
            registry_iface: ens::registry_interface()?,
            resolver_iface: ens::resolver_interface()?,
        })
    }

    /// Call `method(node)` on `target`. An empty reply means there is no
    /// contract at `target` (no ENS on this network), so `name` is unresolved.
    async fn lookup_address(
        &self,
        name: &str,
        iface: &ContractInterface,
        method: &str,
        target: Address,
        node: B256,
    ) -> Result<Address> {
        let data = iface.encode_call(method, &[DynSolValue::FixedBytes(node, 32)])?;
        let raw = self.reader.call(target, data).await?;
        if raw.is_empty() {
            tracing::debug!(name = %name, target = %target, method, "Empty reply during lookup");
            return Err(AppError::AddressResolution(name.to_string()));
        }

        let output = iface.decode_output(method, &raw)?;

        output
            .first()
            .and_then(DynSolValue::as_address)
            .ok_or_else(|| AppError::Decode(format!("{method} did not return an address")))
    }
}

#[async_trait]
impl NameResolver for EnsResolver {
    async fn resolve_name(&self, name: &str) -> Result<Address> {
        let node = ens::namehash(name);
        tracing::debug!(name = %name, node = %node, "Resolving name");

        let resolver = self
            .lookup_address(name, &self.registry_iface, "resolver", self.registry, node)
            .await?;
        if resolver == Address::ZERO {
            return Err(AppError::AddressResolution(name.to_string()));
        }

        let address =
            self.lookup_address(name, &self.resolver_iface, "addr", resolver, node).await?;
        if address == Address::ZERO {
            return Err(AppError::AddressResolution(name.to_string()));
        }

        tracing::debug!(name = %name, address = %address, "Name resolved");
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    struct FixedResolver(Option<Address>);

    #[async_trait]
    impl NameResolver for FixedResolver {
        async fn resolve_name(&self, name: &str) -> Result<Address> {
            self.0.ok_or_else(|| AppError::AddressResolution(name.to_string()))
        }
    }

    #[test]
    fn test_account_ref_parses_address() {
        let parsed: AccountRef = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap();
        assert_eq!(
            parsed,
            AccountRef::Address(address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045"))
        );
    }

    #[test]
    fn test_account_ref_parses_name() {
        let parsed: AccountRef = " Vitalik.ETH ".parse().unwrap();
        assert_eq!(parsed, AccountRef::Name("vitalik.eth".to_string()));
        assert_eq!(parsed.to_string(), "vitalik.eth");
    }

    #[test]
    fn test_account_ref_rejects_invalid() {
        for input in ["", "   ", "0x1234", "0xZZZZ", "vitalik", ".eth", "eth.", "a..eth", "a b.eth"] {
            let result = input.parse::<AccountRef>();
            assert!(
                matches!(result, Err(AppError::InvalidAddress(_))),
                "expected InvalidAddress for {input:?}, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_account_passes_addresses_through() {
        let resolver = FixedResolver(None);
        let addr = address!("6B175474E89094C44Da98b954EedeAC495271d0F");

        let resolved = resolve_account(&resolver, &AccountRef::Address(addr)).await.unwrap();
        assert_eq!(resolved, addr);
    }

    #[tokio::test]
    async fn test_resolve_account_uses_resolver_for_names() {
        let target = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        let resolver = FixedResolver(Some(target));

        let name = AccountRef::Name("vitalik.eth".to_string());
        assert_eq!(resolve_account(&resolver, &name).await.unwrap(), target);

        let missing = FixedResolver(None);
        assert!(matches!(
            resolve_account(&missing, &name).await,
            Err(AppError::AddressResolution(n)) if n == "vitalik.eth"
        ));
    }
}
