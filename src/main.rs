//! Chain Reader
//!
//! Runs read-only chain and token queries from the command line, or serves
//! them as MCP tools over stdio.

use alloy::{hex, primitives::Address};
use clap::{Parser, Subcommand};
use rmcp::ServiceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chain_reader::{
    format_gwei,
    services::{chain_overview, resolve_account, token_overview, ChainOverview, TokenOverview},
    types::{parse_block_tag, parse_tx_hash, ReceiptInfo, TransactionInfo},
    AccountRef, ChainQueryServer, ChainReader, Config, ContractInterface, EnsResolver,
    TokenContractReader,
};

#[derive(Parser)]
#[command(name = "chain-reader", version, about = "Read-only Ethereum chain queries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query balance, network, height, nonce, fees, a block and bytecode
    Provider {
        /// Account address (0x...) or ENS name
        #[arg(long)]
        address: String,
        /// Block number or tag for the balance and block queries
        #[arg(long, default_value = "latest")]
        block: String,
    },
    /// Read ERC20 name, symbol, total supply and a holder's balance
    Token {
        /// Token contract address
        #[arg(long)]
        contract: String,
        /// Holder address (0x...) or ENS name
        #[arg(long)]
        holder: Option<String>,
    },
    /// Look up a transaction, its receipt and its block's transaction count
    Tx {
        /// Transaction hash (0x...)
        #[arg(long)]
        hash: String,
    },
    /// Serve the queries as MCP tools over stdio
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging; stdout is reserved for results and the MCP transport
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Command::Provider { address, block } => {
            let reader = ChainReader::from_config(&config)?;
            let account: AccountRef = address.parse()?;
            let block = parse_block_tag(&block)?;

            let resolver = EnsResolver::new(reader.clone())?;
            let account = resolve_account(&resolver, &account).await?;

            let overview = chain_overview(&reader, account, block).await?;
            print_chain_overview(&overview);
        }
        Command::Token { contract, holder } => {
            let reader = ChainReader::from_config(&config)?;
            let contract = contract.parse::<Address>()?;
            let holder = holder.as_deref().map(str::parse::<AccountRef>).transpose()?;

            let token = TokenContractReader::new(contract, ContractInterface::erc20()?, reader)?;
            let overview = token_overview(&token, holder.as_ref()).await?;
            print_token_overview(&overview);
        }
        Command::Tx { hash } => {
            let reader = ChainReader::from_config(&config)?;
            let hash = parse_tx_hash(&hash)?;

            let tx = reader.get_transaction(hash).await?;
            let receipt = reader.get_transaction_receipt(hash).await?;
            let block_tx_count = match &receipt {
                Some(receipt) => match receipt.block_hash {
                    Some(block_hash) => reader.get_block_transaction_count(block_hash).await?,
                    None => None,
                },
                None => None,
            };
            print_transaction(tx.as_ref(), receipt.as_ref(), block_tx_count);
        }
        Command::Serve => {
            tracing::info!("Starting chain query MCP server");

            let server = ChainQueryServer::new(config)?;

            // Run with stdio transport
            let transport = rmcp::transport::stdio();
            let running = server.serve(transport).await?;

            // Wait for the server to finish
            running.waiting().await?;
        }
    }

    Ok(())
}

fn print_chain_overview(overview: &ChainOverview) {
    let balance = &overview.balance;
    println!("1. Balance of {} at {}", balance.address, balance.block);
    println!("   {} ETH ({} wei)", balance.balance, balance.balance_raw);

    println!("\n2. Connected network");
    println!("   {} (chain id {})", overview.network.name, overview.network.chain_id);

    println!("\n3. Block height");
    println!("   {}", overview.block_number);

    println!("\n4. Transaction count of {}", balance.address);
    println!("   {}", overview.transaction_count);

    let fees = &overview.fee_data;
    let gwei = |value: Option<u128>| value.map(format_gwei).unwrap_or_else(|| "n/a".to_string());
    println!("\n5. Fee data (gwei)");
    println!("   gas price:          {}", gwei(fees.gas_price));
    println!("   base fee:           {}", gwei(fees.base_fee_per_gas.map(u128::from)));
    println!("   max priority fee:   {}", gwei(fees.max_priority_fee_per_gas));
    println!("   max fee:            {}", gwei(fees.max_fee_per_gas));

    println!("\n6. Block {}", balance.block);
    match &overview.block {
        Some(block) => {
            println!("   number:       {}", block.number);
            println!("   hash:         {}", block.hash);
            println!("   parent:       {}", block.parent_hash);
            println!("   timestamp:    {}", block.timestamp);
            println!("   miner:        {}", block.miner);
            println!("   gas used:     {} / {}", block.gas_used, block.gas_limit);
            println!("   transactions: {}", block.transaction_count);
        }
        None => println!("   not found"),
    }

    let code = &overview.code;
    println!("\n7. Bytecode of {}", code.address);
    if code.is_contract {
        println!("   contract, {} bytes", code.size);
        println!("   {}", hex::encode_prefixed(&code.bytecode));
    } else {
        println!("   none (plain account)");
    }
}

fn print_token_overview(overview: &TokenOverview) {
    let token = &overview.token;
    println!("Contract:     {}", token.contract);
    println!("Name:         {}", token.name);
    println!("Symbol:       {}", token.symbol);
    println!("Total supply: {}", token.total_supply);

    if let Some(holder) = &overview.holder {
        println!("Balance of {} ({}): {}", holder.requested, holder.address, holder.balance);
    }
}

fn print_transaction(
    tx: Option<&TransactionInfo>,
    receipt: Option<&ReceiptInfo>,
    block_tx_count: Option<u64>,
) {
    let Some(tx) = tx else {
        println!("Transaction not found");
        return;
    };

    println!("Hash:      {}", tx.hash);
    println!("From:      {}", tx.from);
    match tx.to {
        Some(to) => println!("To:        {to}"),
        None => println!("To:        (contract creation)"),
    }
    println!("Value:     {} wei", tx.value);
    println!("Nonce:     {}", tx.nonce);
    println!("Gas limit: {}", tx.gas_limit);

    if tx.pending {
        println!("Status:    pending");
        return;
    }

    if let Some(receipt) = receipt {
        println!("Status:    {}", if receipt.success { "success" } else { "failed" });
        if let Some(number) = receipt.block_number {
            println!("Block:     {number}");
        }
        println!("Gas used:  {}", receipt.gas_used);
        println!("Gas price: {} gwei", format_gwei(receipt.effective_gas_price));
        if let Some(address) = receipt.contract_address {
            println!("Created:   {address}");
        }
        println!("Logs:      {}", receipt.log_count);
    }

    if let Some(count) = block_tx_count {
        println!("Block transactions: {count}");
    }
}
