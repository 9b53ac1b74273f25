//! Common utilities for integration tests.
//!
//! Provides a JSON-RPC endpoint backed by `wiremock` that answers each
//! `eth_*` method with a canned result while echoing the request id.

#![allow(dead_code)]

use std::time::Duration;

use alloy::{dyn_abi::DynSolValue, hex};
use chain_reader::{ChainReader, Config};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, body_string_contains, method},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Start a fresh mock endpoint.
pub async fn start_node() -> MockServer {
    MockServer::start().await
}

/// A reader pointed at `server` with a short timeout.
pub fn reader_for(server: &MockServer) -> ChainReader {
    ChainReader::new(&server.uri()).unwrap().with_timeout(Duration::from_secs(5))
}

/// Configuration pointed at `server`.
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::new(server.uri());
    config.request_timeout = Duration::from_secs(5);
    config
}

fn request_id(req: &Request) -> Value {
    req.body_json::<Value>().ok().and_then(|body| body.get("id").cloned()).unwrap_or(json!(0))
}

fn result_responder(result: Value) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync {
    move |req: &Request| {
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": request_id(req),
            "result": result,
        }))
    }
}

fn error_responder(code: i64, message: &str) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync {
    let message = message.to_string();
    move |req: &Request| {
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": request_id(req),
            "error": { "code": code, "message": message },
        }))
    }
}

/// Answer every call of `rpc_method` with `result`.
pub async fn mock_result(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(result_responder(result))
        .mount(server)
        .await;
}

/// Answer every call of `rpc_method` with a JSON-RPC error.
pub async fn mock_error(server: &MockServer, rpc_method: &str, code: i64, message: &str) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(error_responder(code, message))
        .mount(server)
        .await;
}

/// Answer `rpc_method` with `result` after `delay`.
pub async fn mock_slow(server: &MockServer, rpc_method: &str, result: Value, delay: Duration) {
    let respond = result_responder(result);
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(move |req: &Request| respond(req).set_delay(delay))
        .mount(server)
        .await;
}

/// Answer `eth_call`s whose calldata contains `selector` (hex, no 0x) with `output`.
pub async fn mock_call(server: &MockServer, selector: &str, output: Vec<DynSolValue>) {
    let encoded = hex::encode_prefixed(DynSolValue::Tuple(output).abi_encode_params());
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_call" })))
        .and(body_string_contains(selector))
        .respond_with(result_responder(json!(encoded)))
        .mount(server)
        .await;
}

/// Number of requests the endpoint received for `rpc_method`.
pub async fn calls_to(server: &MockServer, rpc_method: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| {
            req.body_json::<Value>()
                .map(|body| body["method"] == rpc_method)
                .unwrap_or(false)
        })
        .count()
}

/// Number of `eth_call`s whose calldata contains `selector`.
pub async fn contract_calls_with(server: &MockServer, selector: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| {
            let body = String::from_utf8_lossy(&req.body);
            body.contains("eth_call") && body.contains(selector)
        })
        .count()
}

fn word(byte: u8) -> String {
    format!("0x{}", hex::encode([byte; 32]))
}

/// A block as returned by `eth_getBlockByNumber` with transaction hashes.
pub fn block_json(number: u64, base_fee: Option<u64>, tx_count: usize) -> Value {
    let transactions: Vec<String> = (0..tx_count).map(|i| word(0xa0 + i as u8)).collect();

    let mut block = json!({
        "hash": word(0x11),
        "parentHash": word(0x00),
        "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
        "miner": "0x0000000000000000000000000000000000000000",
        "stateRoot": word(0x22),
        "transactionsRoot": word(0x33),
        "receiptsRoot": word(0x44),
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "difficulty": "0x400000000",
        "totalDifficulty": "0x400000000",
        "number": format!("0x{number:x}"),
        "gasLimit": "0x1388",
        "gasUsed": "0x0",
        "timestamp": "0x0",
        "extraData": "0x",
        "mixHash": word(0x00),
        "nonce": "0x0000000000000042",
        "size": "0x21c",
        "uncles": [],
        "transactions": transactions,
    });

    if let Some(fee) = base_fee {
        block["baseFeePerGas"] = json!(format!("0x{fee:x}"));
    }

    block
}

/// A signed legacy transfer as returned by `eth_getTransactionByHash`.
/// `block_number` of `None` gives a pending transaction.
pub fn legacy_tx_json(block_number: Option<u64>) -> Value {
    let (block_hash, number, index) = match block_number {
        Some(n) => (json!(word(0x11)), json!(format!("0x{n:x}")), json!("0x0")),
        None => (Value::Null, Value::Null, Value::Null),
    };

    json!({
        "type": "0x0",
        "hash": word(0x5d),
        "nonce": "0x15",
        "blockHash": block_hash,
        "blockNumber": number,
        "transactionIndex": index,
        "from": "0xa7d9ddbe1f17865597fbd27ec712455208b6b76d",
        "to": "0xf02c1c8e6114b1dbe8937a39260b5b0a374432bb",
        "value": "0xf3dbb76162000",
        "gasPrice": "0x4a817c800",
        "gas": "0xc350",
        "input": "0x",
        "chainId": "0x1",
        "v": "0x25",
        "r": "0x1b5e176d927f8e9ab405058b2d2457392da3e20f328b16ddabcebc33eaac5fea",
        "s": "0x4ba69724e8f69de52f0125ad8b3c5c2cef33019bac3249e2c0a2192766d1721c",
    })
}

/// A successful receipt for the transaction from [`legacy_tx_json`].
pub fn receipt_json(block_number: u64) -> Value {
    json!({
        "type": "0x0",
        "transactionHash": word(0x5d),
        "transactionIndex": "0x0",
        "blockHash": word(0x11),
        "blockNumber": format!("0x{block_number:x}"),
        "from": "0xa7d9ddbe1f17865597fbd27ec712455208b6b76d",
        "to": "0xf02c1c8e6114b1dbe8937a39260b5b0a374432bb",
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x4a817c800",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "status": "0x1",
    })
}

/// Skip a live test when `ETHEREUM_RPC_URL` is not configured.
#[macro_export]
macro_rules! skip_if_no_endpoint {
    () => {{
        let _ = dotenvy::dotenv();
        match std::env::var("ETHEREUM_RPC_URL") {
            Ok(url) if !url.is_empty() => chain_reader::ChainReader::new(&url).unwrap(),
            _ => {
                eprintln!("Skipping test: ETHEREUM_RPC_URL not set");
                return;
            }
        }
    }};
}
