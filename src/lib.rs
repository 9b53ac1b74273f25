//! Chain Reader Library
//!
//! Read-only queries against Ethereum-compatible JSON-RPC endpoints.
//!
//! # Features
//!
//! - **Chain Queries**: balance, network, block height, nonce, fee data, blocks and bytecode
//! - **Contract Reads**: call contracts through a human-readable interface description
//! - **Name Resolution**: resolve ENS names used as call arguments
//! - **MCP Server**: expose the same queries as tools over stdio
//!
//! # Example
//!
//! ```rust,ignore
//! use chain_reader::{format_ether, ChainReader, ContractInterface, TokenContractReader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reader = ChainReader::new("https://eth.llamarpc.com")?;
//!     let height = reader.get_block_number().await?;
//!
//!     let dai = "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse()?;
//!     let token = TokenContractReader::new(dai, ContractInterface::erc20()?, reader)?;
//!     let supply = token.total_supply().await?;
//!     println!("{height}: {} DAI", format_ether(supply));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod mcp;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use ethereum::{contracts::ContractInterface, ChainReader};
pub use mcp::ChainQueryServer;
pub use services::{AccountRef, CallArg, EnsResolver, NameResolver, TokenContractReader};
pub use types::{format_ether, format_gwei, format_units};
