//! Fixed query sequences over a chain and a token contract.
//!
//! Each overview issues its queries one after another and returns them in
//! issue order, ready to print or serialize.

use alloy::{eips::BlockNumberOrTag, primitives::Address};
use serde::Serialize;

use crate::{
    error::Result,
    ethereum::{constants::ETHER_DECIMALS, ChainReader},
    services::{
        resolver::{resolve_account, AccountRef},
        token::TokenContractReader,
    },
    types::{
        format_ether, format_units, BalanceInfo, BlockInfo, CodeInfo, FeeData, HolderBalance,
        NetworkInfo, TokenInfo,
    },
};

/// Everything the chain overview reads, in query order.
#[derive(Debug, Clone, Serialize)]
pub struct ChainOverview {
    pub balance: BalanceInfo,
    pub network: NetworkInfo,
    pub block_number: u64,
    pub transaction_count: u64,
    pub fee_data: FeeData,
    pub block: Option<BlockInfo>,
    pub code: CodeInfo,
}

/// Everything the token overview reads, in query order.
#[derive(Debug, Clone, Serialize)]
pub struct TokenOverview {
    pub token: TokenInfo,
    pub holder: Option<HolderBalance>,
}

/// Read the balance of `account` at `block`.
pub async fn balance_info(
    reader: &ChainReader,
    account: Address,
    block: BlockNumberOrTag,
) -> Result<BalanceInfo> {
    let balance = reader.get_balance(account, Some(block)).await?;

    Ok(BalanceInfo {
        address: account,
        block: block.to_string(),
        balance: format_ether(balance),
        balance_raw: balance.to_string(),
    })
}

/// Query balance, network, height, nonce, fees, the block at `block` and
/// the code of `account`.
pub async fn chain_overview(
    reader: &ChainReader,
    account: Address,
    block: BlockNumberOrTag,
) -> Result<ChainOverview> {
    tracing::debug!(account = %account, block = %block, "Collecting chain overview");

    let balance = balance_info(reader, account, block).await?;
    let network = reader.get_network().await?;
    let block_number = reader.get_block_number().await?;
    let transaction_count = reader.get_transaction_count(account).await?;
    let fee_data = reader.get_fee_data().await?;
    let block = reader.get_block(block).await?;
    let code = CodeInfo::new(account, reader.get_code(account).await?);

    Ok(ChainOverview { balance, network, block_number, transaction_count, fee_data, block, code })
}

/// Read name, symbol and total supply and, when `holder` is given, the
/// holder's balance. Amounts are formatted with 18 decimals.
pub async fn token_overview(
    token: &TokenContractReader,
    holder: Option<&AccountRef>,
) -> Result<TokenOverview> {
    tracing::debug!(contract = %token.address(), "Collecting token overview");

    let name = token.name().await?;
    let symbol = token.symbol().await?;
    let total_supply = token.total_supply().await?;

    let token_info = TokenInfo {
        contract: token.address(),
        name,
        symbol,
        total_supply: format_units(total_supply, ETHER_DECIMALS),
        total_supply_raw: total_supply.to_string(),
    };

    let holder = match holder {
        Some(account) => {
            let address = resolve_account(token.resolver(), account).await?;
            let balance = token.balance_of(&AccountRef::Address(address)).await?;
            Some(HolderBalance {
                requested: account.to_string(),
                address,
                balance: format_units(balance, ETHER_DECIMALS),
                balance_raw: balance.to_string(),
            })
        }
        None => None,
    };

    Ok(TokenOverview { token: token_info, holder })
}
