//! SolanaChain against an in-process axum JSON-RPC node.

mod common;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use common::{MockSdk, unsigned_tx_for};
use encifher_client::Token;
use encifher_keypair::Keypair;
use encifher_scripts::chain::{ChainError, ChainSubmitter, SolanaChain, partial_sign};
use encifher_scripts::demos::run_deposit;
use encifher_scripts::flows::Session;
use serde_json::{Value, json};
use solana_sdk::instruction::InstructionError;
use solana_sdk::transaction::{Transaction, TransactionError};
use tokio::net::TcpListener;

const SLOT: u64 = 100;

#[derive(Clone, Default)]
struct Node {
    /// Signature echoed by sendTransaction
    signature: String,
    /// Successive getSignatureStatuses entries; null once drained
    statuses: Arc<Mutex<VecDeque<Value>>>,
    blockhash_expired: bool,
    slot_requests: Arc<Mutex<Vec<Value>>>,
    sent: Arc<Mutex<Vec<Value>>>,
    status_requests: Arc<Mutex<u32>>,
}

fn status(confirmation: &str, err: Option<Value>) -> Value {
    let result = match &err {
        Some(e) => json!({ "Err": e }),
        None => json!({ "Ok": null }),
    };
    json!({
        "slot": SLOT,
        "confirmations": null,
        "err": err,
        "status": result,
        "confirmationStatus": confirmation,
    })
}

fn custom_error() -> Value {
    json!({ "InstructionError": [0, { "Custom": 1 }] })
}

async fn rpc(State(node): State<Node>, Json(req): Json<Value>) -> Json<Value> {
    let id = req["id"].clone();
    let params = req["params"].clone();
    let result = match req["method"].as_str().unwrap_or_default() {
        "getVersion" => json!({ "solana-core": "2.2.0", "feature-set": 1 }),
        "getSlot" => {
            node.slot_requests.lock().unwrap().push(params);
            json!(SLOT)
        }
        "sendTransaction" => {
            node.sent.lock().unwrap().push(params);
            json!(node.signature)
        }
        "getSignatureStatuses" => {
            *node.status_requests.lock().unwrap() += 1;
            let next = node.statuses.lock().unwrap().pop_front().unwrap_or(Value::Null);
            json!({ "context": { "slot": SLOT }, "value": [next] })
        }
        "isBlockhashValid" => {
            json!({ "context": { "slot": SLOT }, "value": !node.blockhash_expired })
        }
        other => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("Method not found: {other}") },
            }));
        }
    };
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

async fn spawn_node(node: Node) -> String {
    let app = Router::new().route("/", post(rpc)).with_state(node);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn user() -> Keypair {
    Keypair::from_seed(&[31u8; 32])
}

fn signed_tx() -> Transaction {
    let mut tx = unsigned_tx_for(&user().pubkey());
    partial_sign(&mut tx, &user()).unwrap();
    tx
}

fn node_for(tx: &Transaction, statuses: impl IntoIterator<Item = Value>) -> Node {
    Node {
        signature: tx.signatures[0].to_string(),
        statuses: Arc::new(Mutex::new(statuses.into_iter().collect())),
        ..Node::default()
    }
}

async fn chain(node: &Node) -> SolanaChain {
    let url = spawn_node(node.clone()).await;
    SolanaChain::new(&url).with_confirm_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn sends_with_confirmed_slot_and_preflight() {
    let tx = signed_tx();
    let node = node_for(&tx, [status("confirmed", None)]);
    let chain = chain(&node).await;

    let signature = chain.submit(&tx).await.unwrap();

    assert_eq!(signature, tx.signatures[0]);
    let slot_requests = node.slot_requests.lock().unwrap();
    assert_eq!(slot_requests[0][0]["commitment"], "confirmed");

    let sent = node.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0][1]["minContextSlot"], SLOT);
    assert_eq!(sent[0][1]["preflightCommitment"], "confirmed");
}

#[tokio::test]
async fn waits_until_confirmed() {
    let tx = signed_tx();
    let node = node_for(
        &tx,
        [Value::Null, status("processed", None), status("confirmed", None)],
    );
    let chain = chain(&node).await;

    chain.submit(&tx).await.unwrap();

    assert_eq!(*node.status_requests.lock().unwrap(), 3);
}

#[tokio::test]
async fn failed_transaction_is_an_error() {
    let tx = signed_tx();
    let node = node_for(&tx, [status("confirmed", Some(custom_error()))]);
    let chain = chain(&node).await;

    let err = chain.submit(&tx).await.unwrap_err();

    match err {
        ChainError::Transaction { signature, error } => {
            assert_eq!(signature, tx.signatures[0]);
            assert_eq!(
                error,
                TransactionError::InstructionError(0, InstructionError::Custom(1))
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn expired_blockhash_stops_waiting() {
    let tx = signed_tx();
    let node = Node {
        blockhash_expired: true,
        ..node_for(&tx, [])
    };
    let chain = chain(&node).await;

    let err = chain.submit(&tx).await.unwrap_err();

    assert!(matches!(err, ChainError::Expired(sig) if sig == tx.signatures[0]));
}

#[tokio::test]
async fn deposit_failing_on_chain_is_not_reported_as_success() {
    // MockSdk hands out the same transaction signed_tx() builds
    let tx = signed_tx();
    let node = node_for(&tx, [status("confirmed", Some(custom_error()))]);
    let chain = chain(&node).await;
    let session =
        Session::new(MockSdk::default(), chain, user()).with_settle_delay(Duration::ZERO);
    let usdc = Token {
        token_mint_address: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".into(),
        decimals: 6,
    };

    let report = run_deposit(&session, &usdc, "100000").await;

    assert!(report.attempted("deposit"));
    assert!(!report.succeeded("deposit"));
    assert!(report.succeeded("balance"));
}
