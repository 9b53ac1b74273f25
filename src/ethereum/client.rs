//! Read-only Ethereum JSON-RPC client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::{
    eips::{BlockId, BlockNumberOrTag},
    network::Ethereum,
    primitives::{Address, Bytes, B256, U256, U64},
    providers::{Provider, RootProvider},
    rpc::{client::RpcClient, types::TransactionRequest},
    transports::http::Http,
};
use reqwest::Url;

use crate::{
    config::{Config, DEFAULT_TIMEOUT_SECS},
    error::{AppError, Result},
    ethereum::constants::{network_name, ENS_REGISTRY_ADDRESS},
    types::{BlockInfo, FeeData, NetworkInfo, ReceiptInfo, TransactionInfo},
};

/// Type alias for the HTTP provider.
pub type HttpProvider = RootProvider<Ethereum>;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only view of one JSON-RPC endpoint.
///
/// Cloning is cheap and shares the underlying HTTP connection pool.
#[derive(Clone)]
pub struct ChainReader {
    provider: Arc<HttpProvider>,
    /// Endpoint with any path or query stripped, safe to log.
    endpoint: String,
    timeout: Duration,
    ens_registry: Address,
}

impl ChainReader {
    /// Create a reader for `rpc_url`.
    ///
    /// Note: This does NOT make any network calls. Each query opens or
    /// reuses an HTTP connection when it is issued.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = parse_endpoint(rpc_url)?;
        let endpoint = redact_endpoint(&url);

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        let client = RpcClient::new(Http::with_client(http, url), false);
        let provider = RootProvider::<Ethereum>::new(client);

        tracing::info!(endpoint = %endpoint, "Chain reader created (lazy connection)");

        Ok(Self {
            provider: Arc::new(provider),
            endpoint,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ens_registry: ENS_REGISTRY_ADDRESS,
        })
    }

    /// Create a reader with the endpoint, timeout and ENS registry from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.rpc_url)?
            .with_timeout(config.request_timeout)
            .with_ens_registry(config.ens_registry))
    }

    /// Bound every round trip by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use `registry` for name resolution.
    pub fn with_ens_registry(mut self, registry: Address) -> Self {
        self.ens_registry = registry;
        self
    }

    /// Redacted endpoint (`scheme://host[:port]`).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn ens_registry(&self) -> Address {
        self.ens_registry
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    /// Get the native balance of `address` at `block` (default: latest).
    pub async fn get_balance(
        &self,
        address: Address,
        block: Option<BlockNumberOrTag>,
    ) -> Result<U256> {
        let block = block.unwrap_or(BlockNumberOrTag::Latest);
        tracing::debug!(address = %address, block = %block, "Querying balance");

        self.bounded("eth_getBalance", async {
            Ok(self.provider.get_balance(address).block_id(BlockId::Number(block)).await?)
        })
        .await
    }

    /// Get the chain ID and its well-known name.
    pub async fn get_network(&self) -> Result<NetworkInfo> {
        let chain_id =
            self.bounded("eth_chainId", async { Ok(self.provider.get_chain_id().await?) }).await?;

        tracing::debug!(chain_id = chain_id, endpoint = %self.endpoint, "Queried network");

        Ok(NetworkInfo { chain_id, name: network_name(chain_id).to_string() })
    }

    /// Get the current block height.
    pub async fn get_block_number(&self) -> Result<u64> {
        self.bounded("eth_blockNumber", async { Ok(self.provider.get_block_number().await?) })
            .await
    }

    /// Get the number of transactions sent from `address`.
    pub async fn get_transaction_count(&self, address: Address) -> Result<u64> {
        tracing::debug!(address = %address, "Querying transaction count");

        self.bounded("eth_getTransactionCount", async {
            Ok(self.provider.get_transaction_count(address).await?)
        })
        .await
    }

    /// Get the current fee suggestion.
    ///
    /// RPC error responses for the gas price and priority fee leave the
    /// corresponding field empty. Network failures still fail the call.
    pub async fn get_fee_data(&self) -> Result<FeeData> {
        let gas_price = unsupported_as_none(
            self.bounded("eth_gasPrice", async { Ok(self.provider.get_gas_price().await?) })
                .await,
        )?;

        let latest = self.get_block(BlockNumberOrTag::Latest).await?;
        let base_fee_per_gas = latest.and_then(|block| block.base_fee_per_gas);

        let max_priority_fee_per_gas = match base_fee_per_gas {
            Some(_) => unsupported_as_none(
                self.bounded("eth_maxPriorityFeePerGas", async {
                    Ok(self.provider.get_max_priority_fee_per_gas().await?)
                })
                .await,
            )?,
            None => None,
        };

        let max_fee_per_gas = match (base_fee_per_gas, max_priority_fee_per_gas) {
            (Some(base), Some(priority)) => {
                let max_fee = max_fee_per_gas(base, priority);
                if max_fee.is_none() {
                    tracing::warn!(base, priority, "Max fee per gas overflows u128");
                }
                max_fee
            }
            _ => None,
        };

        Ok(FeeData { gas_price, base_fee_per_gas, max_priority_fee_per_gas, max_fee_per_gas })
    }

    /// Get a block by number or tag. `None` when the block does not exist.
    pub async fn get_block(&self, block: BlockNumberOrTag) -> Result<Option<BlockInfo>> {
        tracing::debug!(block = %block, "Querying block");

        let block = self
            .bounded("eth_getBlockByNumber", async {
                Ok(self.provider.get_block_by_number(block).await?)
            })
            .await?;

        Ok(block.as_ref().map(BlockInfo::from))
    }

    /// Get the deployed code at `address`. Empty for plain accounts.
    pub async fn get_code(&self, address: Address) -> Result<Bytes> {
        tracing::debug!(address = %address, "Querying code");

        self.bounded("eth_getCode", async { Ok(self.provider.get_code_at(address).await?) })
            .await
    }

    /// Whether `address` holds contract code.
    pub async fn is_contract(&self, address: Address) -> Result<bool> {
        Ok(!self.get_code(address).await?.is_empty())
    }

    /// Get the number of transactions in the block with `hash`.
    pub async fn get_block_transaction_count(&self, hash: B256) -> Result<Option<u64>> {
        let count: Option<U64> = self
            .bounded("eth_getBlockTransactionCountByHash", async {
                Ok(self
                    .provider
                    .raw_request("eth_getBlockTransactionCountByHash".into(), (hash,))
                    .await?)
            })
            .await?;

        Ok(count.map(|n| n.to::<u64>()))
    }

    /// Get a transaction by hash. `None` when the node does not know it.
    pub async fn get_transaction(&self, hash: B256) -> Result<Option<TransactionInfo>> {
        tracing::debug!(hash = %hash, "Querying transaction");

        let tx = self
            .bounded("eth_getTransactionByHash", async {
                Ok(self.provider.get_transaction_by_hash(hash).await?)
            })
            .await?;

        Ok(tx.as_ref().map(TransactionInfo::from))
    }

    /// Get the receipt of an included transaction.
    pub async fn get_transaction_receipt(&self, hash: B256) -> Result<Option<ReceiptInfo>> {
        tracing::debug!(hash = %hash, "Querying transaction receipt");

        let receipt = self
            .bounded("eth_getTransactionReceipt", async {
                Ok(self.provider.get_transaction_receipt(hash).await?)
            })
            .await?;

        Ok(receipt.as_ref().map(ReceiptInfo::from))
    }

    /// Execute a read-only contract call against the latest block.
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        tracing::debug!(to = %to, calldata_len = data.len(), "Executing eth_call");

        let tx = TransactionRequest::default().to(to).input(data.into());
        self.bounded("eth_call", async { Ok(self.provider.call(tx).await?) }).await
    }

    /// Run one round trip under the configured timeout.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, endpoint = %self.endpoint, "RPC request timed out");
                Err(AppError::Timeout { operation, timeout: self.timeout })
            }
        }
    }
}

impl std::fmt::Debug for ChainReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainReader")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `2 * base_fee + priority_fee`, `None` if it does not fit in u128.
fn max_fee_per_gas(base_fee: u64, priority_fee: u128) -> Option<u128> {
    u128::from(base_fee).checked_mul(2)?.checked_add(priority_fee)
}

/// Treat an RPC error response as "not supported by this network".
fn unsupported_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppError::Rpc { code, message }) => {
            tracing::debug!(code, message = %message, "Fee field not supported by endpoint");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn parse_endpoint(rpc_url: &str) -> Result<Url> {
    let url: Url = rpc_url
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidEndpoint(format!("not a URL: {rpc_url}")))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        scheme => Err(AppError::InvalidEndpoint(format!(
            "expected an http(s) URL with a host, got scheme '{scheme}'"
        ))),
    }
}

/// Strip path, query and credentials: providers often embed access keys there.
fn redact_endpoint(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}
