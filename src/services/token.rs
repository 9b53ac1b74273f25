//! Token contract reader.

use std::sync::Arc;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};

use crate::{
    error::{AppError, Result},
    ethereum::{contracts::ContractInterface, ChainReader},
    services::resolver::{resolve_account, AccountRef, EnsResolver, NameResolver},
};

/// An argument of a contract call.
#[derive(Debug, Clone)]
pub enum CallArg {
    /// A value passed to the contract as-is.
    Value(DynSolValue),
    /// An account, resolved to an address before the call is encoded.
    Account(AccountRef),
}

impl From<AccountRef> for CallArg {
    fn from(account: AccountRef) -> Self {
        CallArg::Account(account)
    }
}

impl From<DynSolValue> for CallArg {
    fn from(value: DynSolValue) -> Self {
        CallArg::Value(value)
    }
}

/// Read-only calls against one contract through a bound [`ChainReader`].
#[derive(Clone)]
pub struct TokenContractReader {
    address: Address,
    interface: ContractInterface,
    reader: ChainReader,
    resolver: Arc<dyn NameResolver>,
}

impl TokenContractReader {
    /// Bind `interface` to the contract at `address`. No network activity.
    ///
    /// Names passed as arguments are resolved through ENS on the same endpoint.
    pub fn new(address: Address, interface: ContractInterface, reader: ChainReader) -> Result<Self> {
        let resolver = Arc::new(EnsResolver::new(reader.clone())?);
        Ok(Self { address, interface, reader, resolver })
    }

    /// Replace the name resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn NameResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn interface(&self) -> &ContractInterface {
        &self.interface
    }

    /// The resolver used for name arguments.
    pub fn resolver(&self) -> &dyn NameResolver {
        self.resolver.as_ref()
    }

    /// Call `method` with `args` and decode its outputs.
    ///
    /// Name arguments are resolved first; a resolution failure is returned
    /// unwrapped and no contract call is made. Later failures are wrapped
    /// in [`AppError::ContractCall`] naming the method.
    pub async fn call(&self, method: &str, args: Vec<CallArg>) -> Result<Vec<DynSolValue>> {
        let function = self
            .interface
            .function(method)
            .ok_or_else(|| AppError::contract_call(method, AppError::UnknownMethod(method.into())))?;

        if args.len() != function.inputs.len() {
            return Err(AppError::contract_call(
                method,
                AppError::Abi(format!(
                    "expected {} argument(s), got {}",
                    function.inputs.len(),
                    args.len()
                )),
            ));
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = match arg {
                CallArg::Value(value) => value,
                CallArg::Account(account) => {
                    DynSolValue::Address(resolve_account(self.resolver.as_ref(), &account).await?)
                }
            };
            values.push(value);
        }

        tracing::debug!(contract = %self.address, method, "Calling contract");

        self.invoke(method, &values).await.map_err(|e| AppError::contract_call(method, e))
    }

    async fn invoke(&self, method: &str, values: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
        let data = self.interface.encode_call(method, values)?;
        let raw = self.reader.call(self.address, data).await?;
        self.interface.decode_output(method, &raw)
    }

    /// Token name.
    pub async fn name(&self) -> Result<String> {
        let output = self.call("name", Vec::new()).await?;
        first_string("name", &output)
    }

    /// Token symbol.
    pub async fn symbol(&self) -> Result<String> {
        let output = self.call("symbol", Vec::new()).await?;
        first_string("symbol", &output)
    }

    /// Token decimals.
    pub async fn decimals(&self) -> Result<u8> {
        let output = self.call("decimals", Vec::new()).await?;
        let value = first_uint("decimals", &output)?;
        if value > U256::from(u8::MAX) {
            return Err(AppError::contract_call(
                "decimals",
                AppError::Decode(format!("{value} does not fit in u8")),
            ));
        }
        Ok(value.to::<u8>())
    }

    /// Total supply in the smallest unit.
    pub async fn total_supply(&self) -> Result<U256> {
        let output = self.call("totalSupply", Vec::new()).await?;
        first_uint("totalSupply", &output)
    }

    /// Balance of `holder` in the smallest unit.
    pub async fn balance_of(&self, holder: &AccountRef) -> Result<U256> {
        let output = self.call("balanceOf", vec![CallArg::Account(holder.clone())]).await?;
        first_uint("balanceOf", &output)
    }
}

impl std::fmt::Debug for TokenContractReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenContractReader")
            .field("address", &self.address)
            .field("methods", &self.interface.method_names().collect::<Vec<_>>())
            .finish()
    }
}

fn first_string(method: &str, output: &[DynSolValue]) -> Result<String> {
    output
        .first()
        .and_then(DynSolValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| mismatch(method, "string", output))
}

fn first_uint(method: &str, output: &[DynSolValue]) -> Result<U256> {
    output
        .first()
        .and_then(DynSolValue::as_uint)
        .map(|(value, _bits)| value)
        .ok_or_else(|| mismatch(method, "unsigned integer", output))
}

fn mismatch(method: &str, expected: &str, output: &[DynSolValue]) -> AppError {
    let found = output
        .first()
        .and_then(DynSolValue::sol_type_name)
        .map(|name| name.into_owned())
        .unwrap_or_else(|| "nothing".to_string());
    AppError::contract_call(method, AppError::Decode(format!("expected {expected}, got {found}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn reader() -> TokenContractReader {
        let chain = ChainReader::new("http://127.0.0.1:1").unwrap();
        let iface = ContractInterface::erc20().unwrap();
        TokenContractReader::new(address!("6B175474E89094C44Da98b954EedeAC495271d0F"), iface, chain)
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_method_is_contract_call_error() {
        let token = reader();
        let err = token.call("transfer", Vec::new()).await.unwrap_err();

        match err {
            AppError::ContractCall { method, source } => {
                assert_eq!(method, "transfer");
                assert!(matches!(*source, AppError::UnknownMethod(_)));
            }
            other => panic!("Expected ContractCall error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_arity_is_rejected_before_network() {
        let token = reader();
        let err = token.call("balanceOf", Vec::new()).await.unwrap_err();

        match err {
            AppError::ContractCall { method, source } => {
                assert_eq!(method, "balanceOf");
                assert!(matches!(*source, AppError::Abi(_)));
            }
            other => panic!("Expected ContractCall error, got {other:?}"),
        }
    }

    #[test]
    fn test_first_string_mismatch() {
        let output = vec![DynSolValue::Uint(U256::from(7u64), 256)];
        let err = first_string("name", &output).unwrap_err();
        assert!(err.to_string().contains("expected string, got uint256"));
    }

    #[test]
    fn test_first_uint_on_empty_output() {
        let err = first_uint("totalSupply", &[]).unwrap_err();
        assert!(err.to_string().contains("got nothing"));
    }

    #[test]
    fn test_debug_lists_methods() {
        let debug_str = format!("{:?}", reader());
        assert!(debug_str.contains("TokenContractReader"));
        assert!(debug_str.contains("balanceOf"));
    }
}
