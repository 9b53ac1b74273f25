//! Chain-level records returned by the reader.

use alloy::{
    consensus::Transaction as _,
    eips::BlockNumberOrTag,
    primitives::{Address, Bytes, B256},
    rpc::types::{Block, Transaction, TransactionReceipt},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Native balance of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceInfo {
    /// Account address.
    pub address: Address,
    /// Block the balance was read at.
    pub block: String,
    /// Human-readable balance in ether.
    pub balance: String,
    /// Raw balance in wei.
    pub balance_raw: String,
}

/// Identity of the connected network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub name: String,
}

/// Current fee suggestion. Fields the network does not support stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeData {
    /// Legacy gas price (wei).
    pub gas_price: Option<u128>,
    /// Base fee of the latest block (wei), absent before London.
    pub base_fee_per_gas: Option<u64>,
    /// Suggested priority fee (wei).
    pub max_priority_fee_per_gas: Option<u128>,
    /// `2 * base_fee + priority_fee` when both are known.
    pub max_fee_per_gas: Option<u128>,
}

/// Summary of a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInfo {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub timestamp: u64,
    pub miner: Address,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub base_fee_per_gas: Option<u64>,
    pub difficulty: String,
    pub transaction_count: usize,
}

impl From<&Block> for BlockInfo {
    fn from(block: &Block) -> Self {
        let header = &block.header;
        Self {
            number: header.number,
            hash: header.hash,
            parent_hash: header.parent_hash,
            timestamp: header.timestamp,
            miner: header.beneficiary,
            gas_used: header.gas_used,
            gas_limit: header.gas_limit,
            base_fee_per_gas: header.base_fee_per_gas,
            difficulty: header.difficulty.to_string(),
            transaction_count: block.transactions.len(),
        }
    }
}

/// Summary of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub hash: B256,
    pub from: Address,
    /// Recipient, `None` for contract creation.
    pub to: Option<Address>,
    /// Transferred value in wei.
    pub value: String,
    pub nonce: u64,
    pub gas_limit: u64,
    pub block_number: Option<u64>,
    /// True while the transaction is not yet included in a block.
    pub pending: bool,
}

impl From<&Transaction> for TransactionInfo {
    fn from(tx: &Transaction) -> Self {
        let envelope = tx.inner.inner();
        Self {
            hash: *envelope.tx_hash(),
            from: tx.inner.signer(),
            to: envelope.to(),
            value: envelope.value().to_string(),
            nonce: envelope.nonce(),
            gas_limit: envelope.gas_limit(),
            block_number: tx.block_number,
            pending: tx.block_number.is_none(),
        }
    }
}

/// Outcome of an included transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptInfo {
    pub transaction_hash: B256,
    pub success: bool,
    pub block_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub contract_address: Option<Address>,
    pub log_count: usize,
}

impl From<&TransactionReceipt> for ReceiptInfo {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            success: receipt.status(),
            block_hash: receipt.block_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
            contract_address: receipt.contract_address,
            log_count: receipt.inner.logs().len(),
        }
    }
}

/// Deployed code at an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeInfo {
    pub address: Address,
    pub is_contract: bool,
    /// Code size in bytes.
    pub size: usize,
    pub bytecode: Bytes,
}

impl CodeInfo {
    pub fn new(address: Address, bytecode: Bytes) -> Self {
        Self { address, is_contract: !bytecode.is_empty(), size: bytecode.len(), bytecode }
    }
}

/// Parse a block selector.
///
/// Accepts the tags `latest`, `pending`, `earliest`, `safe` and `finalized`
/// (case-insensitive), decimal block numbers and `0x`-prefixed hex numbers.
pub fn parse_block_tag(input: &str) -> Result<BlockNumberOrTag> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(AppError::Parse("Block selector cannot be empty".to_string()));
    }

    let tag = match trimmed.to_ascii_lowercase().as_str() {
        "latest" => BlockNumberOrTag::Latest,
        "pending" => BlockNumberOrTag::Pending,
        "earliest" => BlockNumberOrTag::Earliest,
        "safe" => BlockNumberOrTag::Safe,
        "finalized" => BlockNumberOrTag::Finalized,
        lower => match lower.strip_prefix("0x") {
            Some(hex) => BlockNumberOrTag::Number(u64::from_str_radix(hex, 16)?),
            None => BlockNumberOrTag::Number(lower.parse::<u64>()?),
        },
    };

    Ok(tag)
}

/// Parse a `0x`-prefixed 32-byte transaction or block hash.
pub fn parse_tx_hash(input: &str) -> Result<B256> {
    let trimmed = input.trim();

    if !(trimmed.starts_with("0x") || trimmed.starts_with("0X")) {
        return Err(AppError::Parse(format!("Hash must start with 0x, got '{trimmed}'")));
    }

    trimmed.parse::<B256>().map_err(|e| AppError::Parse(format!("Invalid hash '{trimmed}': {e}")))
}
