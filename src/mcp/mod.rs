//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::ChainQueryServer;
pub use server::{AccountInput, GetBalanceInput, GetBlockInput, GetTokenInfoInput, HashInput};
