//! Ethereum interaction module.
//!
//! Contains the read-only RPC client, network constants and contract bindings.

pub mod client;
pub mod constants;
pub mod contracts;

pub use client::{ChainReader, HttpProvider};
