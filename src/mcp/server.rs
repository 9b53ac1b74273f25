//! MCP server implementation.

use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, B256},
};
use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;

use crate::{
    config::Config,
    error::AppError,
    ethereum::{contracts::ContractInterface, ChainReader},
    services::{
        overview::{balance_info, token_overview},
        resolve_account, AccountRef, EnsResolver, TokenContractReader,
    },
    types::{parse_block_tag, parse_tx_hash, CodeInfo},
};

/// Read-only chain query MCP server.
///
/// Exposes balance, network, block, fee, code and token queries as tools.
#[derive(Clone)]
pub struct ChainQueryServer {
    reader: ChainReader,
    resolver: EnsResolver,
    tool_router: ToolRouter<Self>,
}

impl ChainQueryServer {
    /// Create a new chain query server.
    ///
    /// Note: no network calls are made during startup. The endpoint is
    /// first contacted when a tool is invoked.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!("Initializing chain query MCP server");

        let reader = ChainReader::from_config(&config)?;
        let resolver = EnsResolver::new(reader.clone())?;

        Ok(Self { reader, resolver, tool_router: Self::tool_router() })
    }

    async fn resolve(&self, input: &str) -> Result<Address, McpError> {
        let account: AccountRef = input.parse().map_err(McpError::from)?;
        Ok(resolve_account(&self.resolver, &account).await?)
    }
}

/// Input parameters for the get_balance tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetBalanceInput {
    /// Account address (0x...) or ENS name (e.g. "vitalik.eth").
    pub address: String,
    /// Block number or tag ("latest", "pending", "0x10", "12345"). Defaults to "latest".
    #[serde(default)]
    pub block: Option<String>,
}

/// Input parameters for tools taking a single account.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct AccountInput {
    /// Account address (0x...) or ENS name (e.g. "vitalik.eth").
    pub address: String,
}

/// Input parameters for the get_block tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetBlockInput {
    /// Block number or tag. Defaults to "latest".
    #[serde(default)]
    pub block: Option<String>,
}

/// Input parameters for the get_token_info tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetTokenInfoInput {
    /// ERC20 token contract address (0x...).
    pub contract: String,
    /// Optional holder address or ENS name whose balance to include.
    #[serde(default)]
    pub holder: Option<String>,
}

/// Input parameters for tools taking a transaction or block hash.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct HashInput {
    /// 32-byte hash (0x...).
    pub hash: String,
}

fn parse_hash(input: &str) -> Result<B256, McpError> {
    Ok(parse_tx_hash(input)?)
}

fn parse_block(input: Option<&str>) -> Result<BlockNumberOrTag, McpError> {
    match input {
        Some(raw) => Ok(parse_block_tag(raw)?),
        None => Ok(BlockNumberOrTag::Latest),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[tool_router]
impl ChainQueryServer {
    /// Query the native balance of an account.
    #[tool(description = "Query the native balance of an account (address or ENS name) at a block")]
    pub async fn get_balance(
        &self,
        Parameters(input): Parameters<GetBalanceInput>,
    ) -> Result<String, McpError> {
        tracing::info!(address = %input.address, block = ?input.block, "get_balance called");

        let block = parse_block(input.block.as_deref())?;
        let address = self.resolve(&input.address).await?;
        let result = balance_info(&self.reader, address, block).await?;

        to_json(&result)
    }

    /// Query the chain ID and network name.
    #[tool(description = "Query the chain ID and name of the connected network")]
    pub async fn get_network(&self) -> Result<String, McpError> {
        tracing::info!("get_network called");

        let result = self.reader.get_network().await?;
        to_json(&result)
    }

    /// Query the current block height.
    #[tool(description = "Query the current block height")]
    pub async fn get_block_number(&self) -> Result<String, McpError> {
        tracing::info!("get_block_number called");

        let height = self.reader.get_block_number().await?;
        to_json(&serde_json::json!({ "block_number": height }))
    }

    /// Query how many transactions an account has sent.
    #[tool(description = "Query the number of transactions sent from an account")]
    pub async fn get_transaction_count(
        &self,
        Parameters(input): Parameters<AccountInput>,
    ) -> Result<String, McpError> {
        tracing::info!(address = %input.address, "get_transaction_count called");

        let address = self.resolve(&input.address).await?;
        let count = self.reader.get_transaction_count(address).await?;
        to_json(&serde_json::json!({ "address": address, "transaction_count": count }))
    }

    /// Query the current fee suggestion.
    #[tool(description = "Query gas price, base fee and priority fee suggestions (wei)")]
    pub async fn get_fee_data(&self) -> Result<String, McpError> {
        tracing::info!("get_fee_data called");

        let result = self.reader.get_fee_data().await?;
        to_json(&result)
    }

    /// Query a block by number or tag.
    #[tool(description = "Query a block by number or tag; returns null if the block does not exist")]
    pub async fn get_block(
        &self,
        Parameters(input): Parameters<GetBlockInput>,
    ) -> Result<String, McpError> {
        tracing::info!(block = ?input.block, "get_block called");

        let block = parse_block(input.block.as_deref())?;
        let result = self.reader.get_block(block).await?;
        to_json(&result)
    }

    /// Query deployed bytecode.
    #[tool(description = "Query the deployed bytecode of an address; empty for plain accounts")]
    pub async fn get_code(
        &self,
        Parameters(input): Parameters<AccountInput>,
    ) -> Result<String, McpError> {
        tracing::info!(address = %input.address, "get_code called");

        let address = self.resolve(&input.address).await?;
        let code = self.reader.get_code(address).await?;
        to_json(&CodeInfo::new(address, code))
    }

    /// Query the number of transactions in a block.
    #[tool(description = "Query the number of transactions in the block with the given hash")]
    pub async fn get_block_transaction_count(
        &self,
        Parameters(input): Parameters<HashInput>,
    ) -> Result<String, McpError> {
        tracing::info!(hash = %input.hash, "get_block_transaction_count called");

        let hash = parse_hash(&input.hash)?;
        let count = self.reader.get_block_transaction_count(hash).await?;
        to_json(&serde_json::json!({ "block_hash": hash, "transaction_count": count }))
    }

    /// Query a transaction by hash.
    #[tool(description = "Query a transaction by hash; returns null if the node does not know it")]
    pub async fn get_transaction(
        &self,
        Parameters(input): Parameters<HashInput>,
    ) -> Result<String, McpError> {
        tracing::info!(hash = %input.hash, "get_transaction called");

        let hash = parse_hash(&input.hash)?;
        let result = self.reader.get_transaction(hash).await?;
        to_json(&result)
    }

    /// Query the receipt of a transaction.
    #[tool(description = "Query the receipt of an included transaction; null while pending")]
    pub async fn get_transaction_receipt(
        &self,
        Parameters(input): Parameters<HashInput>,
    ) -> Result<String, McpError> {
        tracing::info!(hash = %input.hash, "get_transaction_receipt called");

        let hash = parse_hash(&input.hash)?;
        let result = self.reader.get_transaction_receipt(hash).await?;
        to_json(&result)
    }

    /// Query ERC20 token state.
    #[tool(
        description = "Query ERC20 name, symbol and total supply, plus a holder's balance when given"
    )]
    pub async fn get_token_info(
        &self,
        Parameters(input): Parameters<GetTokenInfoInput>,
    ) -> Result<String, McpError> {
        tracing::info!(contract = %input.contract, holder = ?input.holder, "get_token_info called");

        let contract = match input.contract.parse::<AccountRef>()? {
            AccountRef::Address(address) => address,
            AccountRef::Name(name) => {
                return Err(McpError::invalid_params(
                    format!("Token contract must be a 0x address, got '{name}'"),
                    None,
                ))
            }
        };
        let holder = input.holder.as_deref().map(str::parse::<AccountRef>).transpose()?;

        let token =
            TokenContractReader::new(contract, ContractInterface::erc20()?, self.reader.clone())?;
        let result = token_overview(&token, holder.as_ref()).await?;

        to_json(&result)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ChainQueryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "chain-reader".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only chain query server. Provides tools for balances, network identity, \
                 blocks, transactions, fees, bytecode and ERC20 token state."
                    .to_string(),
            ),
        }
    }
}
