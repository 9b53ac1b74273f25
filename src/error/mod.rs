//! Error types and handling module.
//!
//! Defines all application-specific error types and conversions.

use std::time::Duration;

use alloy::transports::{RpcError, TransportError};
use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The RPC endpoint is not a usable http(s) URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Endpoint unreachable or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// A request did not complete within the per-call timeout.
    #[error("Request timed out after {timeout:?}: {operation}")]
    Timeout { operation: &'static str, timeout: Duration },

    /// The endpoint answered with a well-formed JSON-RPC error.
    #[error("Ethereum RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Invalid Ethereum address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A human-readable name has no registered address.
    #[error("Name not resolved: {0}")]
    AddressResolution(String),

    /// Returned data does not match the expected type.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Interface description or call encoding errors.
    #[error("ABI error: {0}")]
    Abi(String),

    /// The interface has no method with this name.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// A contract call failed after name resolution.
    #[error("Contract call `{method}` failed: {source}")]
    ContractCall {
        method: String,
        #[source]
        source: Box<AppError>,
    },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AppError {
    /// Wrap an error as the failure of contract method `method`.
    pub fn contract_call(method: impl Into<String>, source: AppError) -> Self {
        AppError::ContractCall { method: method.into(), source: Box::new(source) }
    }

    /// Whether this error comes from talking to the endpoint
    /// (unreachable, timed out, or an RPC error response).
    pub fn is_query_error(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Timeout { .. } | AppError::Rpc { .. })
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => {
                AppError::Rpc { code: payload.code, message: payload.message.to_string() }
            }
            RpcError::DeserError { err, .. } => AppError::Decode(err.to_string()),
            other => AppError::Network(other.to_string()),
        }
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidAddress(_)
            | AppError::AddressResolution(_)
            | AppError::UnknownMethod(_)
            | AppError::Parse(_) => McpError::invalid_params(err.to_string(), None),
            AppError::Config(_) | AppError::InvalidEndpoint(_) => {
                McpError::invalid_request(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
