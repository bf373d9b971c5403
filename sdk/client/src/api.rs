//! The SDK operations the demos rely on.
//!
//! [`crate::DefiClient`] is the HTTP implementation. Flows in the scripts
//! crate are generic over this trait so they can run against an in-process
//! double.

use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::error::DefiResult;
use crate::types::{
    AnonTransferMessage, AnonTransferParams, DepositParams, ExecuteSwapResponse, MessageToSign,
    OrderStatus, OrderStatusParams, SignedAnonTransferParams, SignedMessage, SignedSwapParams,
    SwapParams, SwapQuote, SwapQuoteParams, TokenMint, WithdrawParams,
};

#[allow(async_fn_in_trait)]
pub trait DefiApi {
    /// Unsigned deposit transaction; the depositor must co-sign.
    async fn get_deposit_txn(&self, params: &DepositParams) -> DefiResult<Transaction>;

    /// Unsigned withdraw transaction; the withdrawer must co-sign.
    async fn get_withdraw_txn(&self, params: &WithdrawParams) -> DefiResult<Transaction>;

    async fn get_swap_quote(&self, params: &SwapQuoteParams) -> DefiResult<SwapQuote>;

    /// Swap transaction to be signed and handed back through
    /// [`DefiApi::execute_swap_txn`], never broadcast by the caller.
    async fn get_swap_txn(&self, params: &SwapParams) -> DefiResult<Transaction>;

    async fn execute_swap_txn(&self, params: &SignedSwapParams)
    -> DefiResult<ExecuteSwapResponse>;

    async fn get_order_status(&self, params: &OrderStatusParams) -> DefiResult<OrderStatus>;

    /// Challenge that must be signed before balances are revealed.
    async fn get_message_to_sign(&self) -> DefiResult<MessageToSign>;

    /// Decrypted balances of `owner` for `mints`. The shape is defined by the
    /// SDK and passed through untouched.
    async fn get_balance(
        &self,
        owner: &Pubkey,
        signed: &SignedMessage,
        mints: &[String],
    ) -> DefiResult<Value>;

    async fn get_user_token_mints(&self, owner: &Pubkey) -> DefiResult<Vec<TokenMint>>;

    async fn get_anon_transfer_message_to_sign(
        &self,
        params: &AnonTransferParams,
    ) -> DefiResult<AnonTransferMessage>;

    /// Returns the transfer's transaction signature.
    async fn send_signed_anon_transfer_params(
        &self,
        params: &SignedAnonTransferParams,
    ) -> DefiResult<String>;
}
