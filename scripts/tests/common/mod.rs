//! In-process doubles for the SDK service and the chain.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use encifher_client::{
    AnonTransferMessage, AnonTransferParams, DefiApi, DefiError, DefiResult, DepositParams,
    ExecuteSwapResponse, MessageToSign, OrderState, OrderStatus, OrderStatusParams,
    SignedAnonTransferParams, SignedMessage, SignedSwapParams, SwapParams, SwapQuote,
    SwapQuoteParams, TokenMint, WithdrawParams,
};
use encifher_scripts::chain::{ChainError, ChainSubmitter};
use serde_json::{Map, Value, json};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

pub const MSG_HASH: &str = "0x5d41402abc4b2a76b9719d911017c592";
pub const ANON_MSG_HASH: &str = "anon-transfer-hash";

/// Scripted answer for one order status lookup.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Pending,
    Completed,
    Fail,
}

fn api_error(what: &str) -> DefiError {
    DefiError::Api {
        status: 500,
        body: format!("{what} unavailable"),
    }
}

/// Transaction that needs `signer`'s signature, as the SDK would hand it out.
pub fn unsigned_tx_for(signer: &Pubkey) -> Transaction {
    let ix = Instruction::new_with_bytes(
        Pubkey::new_from_array([42u8; 32]),
        b"encifher",
        vec![AccountMeta::new(*signer, true)],
    );
    let message = Message::new_with_blockhash(&[ix], Some(signer), &Hash::new_from_array([3u8; 32]));
    Transaction::new_unsigned(message)
}

#[derive(Default)]
pub struct MockSdk {
    pub fail_deposit: bool,
    pub fail_withdraw: bool,
    pub fail_quote: bool,
    pub fail_swap_txn: bool,
    pub fail_anon_transfer: bool,
    /// Accept the swap but leave out its order id
    pub omit_order_id: bool,
    pub statuses: Mutex<VecDeque<Step>>,

    pub calls: Mutex<Vec<&'static str>>,
    pub status_queries: Mutex<u32>,
    pub balance_reads: Mutex<Vec<(Pubkey, SignedMessage, Vec<String>)>>,
    pub executed: Mutex<Vec<SignedSwapParams>>,
    pub anon_submissions: Mutex<Vec<SignedAnonTransferParams>>,
}

impl MockSdk {
    pub fn with_statuses(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            statuses: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_queries(&self) -> u32 {
        *self.status_queries.lock().unwrap()
    }

    fn log(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DefiApi for MockSdk {
    async fn get_deposit_txn(&self, params: &DepositParams) -> DefiResult<Transaction> {
        self.log("get_deposit_txn");
        if self.fail_deposit {
            return Err(api_error("deposit"));
        }
        Ok(unsigned_tx_for(&params.depositor))
    }

    async fn get_withdraw_txn(&self, params: &WithdrawParams) -> DefiResult<Transaction> {
        self.log("get_withdraw_txn");
        if self.fail_withdraw {
            return Err(api_error("withdraw"));
        }
        Ok(unsigned_tx_for(&params.withdrawer))
    }

    async fn get_swap_quote(&self, params: &SwapQuoteParams) -> DefiResult<SwapQuote> {
        self.log("get_swap_quote");
        if self.fail_quote {
            return Err(api_error("quote"));
        }
        Ok(SwapQuote {
            amount_out: Some(params.amount_in.clone()),
            extra: Map::new(),
        })
    }

    async fn get_swap_txn(&self, params: &SwapParams) -> DefiResult<Transaction> {
        self.log("get_swap_txn");
        if self.fail_swap_txn {
            return Err(api_error("swap"));
        }
        Ok(unsigned_tx_for(&params.sender_pubkey))
    }

    async fn execute_swap_txn(
        &self,
        params: &SignedSwapParams,
    ) -> DefiResult<ExecuteSwapResponse> {
        self.log("execute_swap_txn");
        self.executed.lock().unwrap().push(params.clone());
        Ok(ExecuteSwapResponse {
            order_status_identifier: (!self.omit_order_id).then(|| "order-1".into()),
            extra: Map::new(),
        })
    }

    async fn get_order_status(&self, _params: &OrderStatusParams) -> DefiResult<OrderStatus> {
        *self.status_queries.lock().unwrap() += 1;
        let step = self.statuses.lock().unwrap().pop_front().unwrap_or(Step::Pending);
        let status = match step {
            Step::Pending => OrderState::Pending,
            Step::Completed => OrderState::Completed,
            Step::Fail => return Err(api_error("status")),
        };
        Ok(OrderStatus {
            status,
            extra: Map::new(),
        })
    }

    async fn get_message_to_sign(&self) -> DefiResult<MessageToSign> {
        self.log("get_message_to_sign");
        Ok(MessageToSign {
            msg_hash: MSG_HASH.into(),
            extra: Map::from_iter([("nonce".to_string(), json!(1))]),
        })
    }

    async fn get_balance(
        &self,
        owner: &Pubkey,
        signed: &SignedMessage,
        mints: &[String],
    ) -> DefiResult<Value> {
        self.log("get_balance");
        self.balance_reads
            .lock()
            .unwrap()
            .push((*owner, signed.clone(), mints.to_vec()));
        let balances: Map<String, Value> = mints.iter().map(|m| (m.clone(), json!("0"))).collect();
        Ok(Value::Object(balances))
    }

    async fn get_user_token_mints(&self, _owner: &Pubkey) -> DefiResult<Vec<TokenMint>> {
        self.log("get_user_token_mints");
        Ok(vec![
            TokenMint {
                mint: "mint-a".into(),
                extra: Map::new(),
            },
            TokenMint {
                mint: "mint-b".into(),
                extra: Map::new(),
            },
        ])
    }

    async fn get_anon_transfer_message_to_sign(
        &self,
        params: &AnonTransferParams,
    ) -> DefiResult<AnonTransferMessage> {
        self.log("get_anon_transfer_message_to_sign");
        if self.fail_anon_transfer {
            return Err(api_error("anon transfer"));
        }
        Ok(AnonTransferMessage {
            msg_hash: ANON_MSG_HASH.into(),
            extended_anon_transfer_params: json!({ "params": params, "nonce": 9 }),
        })
    }

    async fn send_signed_anon_transfer_params(
        &self,
        params: &SignedAnonTransferParams,
    ) -> DefiResult<String> {
        self.log("send_signed_anon_transfer_params");
        self.anon_submissions.lock().unwrap().push(params.clone());
        Ok("anon-sig".into())
    }
}

/// Records what would have been broadcast.
#[derive(Default)]
pub struct MockChain {
    pub submitted: Mutex<Vec<Transaction>>,
}

impl ChainSubmitter for MockChain {
    async fn submit(&self, tx: &Transaction) -> Result<Signature, ChainError> {
        self.submitted.lock().unwrap().push(tx.clone());
        Ok(tx.signatures[0])
    }
}
