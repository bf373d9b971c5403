//! HTTP implementation of [`DefiApi`].
//!
//! Every call is a JSON request against `<api_url>/<route>`:
//!
//! ```text
//!   POST deposit/txn            DepositParams          -> { serializedTxn }
//!   POST withdraw/txn           WithdrawParams         -> { serializedTxn }
//!   POST swap/quote             SwapQuoteParams        -> SwapQuote
//!   POST swap/txn               SwapParams             -> { serializedTxn }
//!   POST swap/execute           SignedSwapParams       -> ExecuteSwapResponse
//!   POST swap/order-status      OrderStatusParams      -> OrderStatus
//!   GET  balance/message                               -> MessageToSign
//!   POST balance                { userPubkey, signedMessage, tokenMints } -> balances
//!   POST user/token-mints       { userPubkey }         -> [TokenMint]
//!   POST anon-transfer/message  AnonTransferParams     -> AnonTransferMessage
//!   POST anon-transfer/submit   SignedAnonTransferParams -> signature
//! ```
//!
//! The access key rides in `x-api-key`, the network mode in `x-network-mode`.

use std::time::Duration;

use log::debug;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::api::DefiApi;
use crate::error::{DefiError, DefiResult};
use crate::txn;
use crate::types::{
    AnonTransferMessage, AnonTransferParams, AnonTransferReceipt, DepositParams,
    ExecuteSwapResponse, MessageToSign, NetworkMode, OrderStatus, OrderStatusParams,
    SignedAnonTransferParams, SignedMessage, SignedSwapParams, SwapParams, SwapQuote,
    SwapQuoteParams, TokenMint, TxnEnvelope, WithdrawParams,
};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const NETWORK_MODE_HEADER: &str = "x-network-mode";

#[derive(Clone)]
pub struct DefiClientConfig {
    pub encifher_key: String,
    pub api_url: String,
    pub mode: NetworkMode,
    pub timeout: Duration,
}

impl std::fmt::Debug for DefiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefiClientConfig")
            .field("encifher_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct DefiClient {
    http: reqwest::Client,
    base_url: String,
    encifher_key: String,
    mode: NetworkMode,
}

impl DefiClient {
    pub fn new(config: DefiClientConfig) -> DefiResult<Self> {
        if config.encifher_key.trim().is_empty() {
            return Err(DefiError::Config("encifher key is empty".into()));
        }
        let base_url = config.api_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(DefiError::Config("api url is empty".into()));
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            encifher_key: config.encifher_key,
            mode: config.mode,
        })
    }

    pub fn mode(&self) -> NetworkMode {
        self.mode
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, route);
        debug!("{} {}", method, url);
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, &self.encifher_key)
            .header(NETWORK_MODE_HEADER, self.mode.as_str())
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> DefiResult<T> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("SDK error {}: {}", status, body);
            return Err(DefiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        route: &str,
        body: &B,
    ) -> DefiResult<T> {
        self.send(self.request(Method::POST, route).json(body)).await
    }

    async fn get<T: DeserializeOwned>(&self, route: &str) -> DefiResult<T> {
        self.send(self.request(Method::GET, route)).await
    }

    async fn post_txn<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> DefiResult<Transaction> {
        let envelope: TxnEnvelope = self.post(route, body).await?;
        txn::decode_transaction(&envelope.serialized_txn)
    }
}

impl DefiApi for DefiClient {
    async fn get_deposit_txn(&self, params: &DepositParams) -> DefiResult<Transaction> {
        self.post_txn("deposit/txn", params).await
    }

    async fn get_withdraw_txn(&self, params: &WithdrawParams) -> DefiResult<Transaction> {
        self.post_txn("withdraw/txn", params).await
    }

    async fn get_swap_quote(&self, params: &SwapQuoteParams) -> DefiResult<SwapQuote> {
        self.post("swap/quote", params).await
    }

    async fn get_swap_txn(&self, params: &SwapParams) -> DefiResult<Transaction> {
        self.post_txn("swap/txn", params).await
    }

    async fn execute_swap_txn(
        &self,
        params: &SignedSwapParams,
    ) -> DefiResult<ExecuteSwapResponse> {
        self.post("swap/execute", params).await
    }

    async fn get_order_status(&self, params: &OrderStatusParams) -> DefiResult<OrderStatus> {
        self.post("swap/order-status", params).await
    }

    async fn get_message_to_sign(&self) -> DefiResult<MessageToSign> {
        self.get("balance/message").await
    }

    async fn get_balance(
        &self,
        owner: &Pubkey,
        signed: &SignedMessage,
        mints: &[String],
    ) -> DefiResult<Value> {
        let body = json!({
            "userPubkey": owner.to_string(),
            "signedMessage": signed,
            "tokenMints": mints,
        });
        self.post("balance", &body).await
    }

    async fn get_user_token_mints(&self, owner: &Pubkey) -> DefiResult<Vec<TokenMint>> {
        let body = json!({ "userPubkey": owner.to_string() });
        self.post("user/token-mints", &body).await
    }

    async fn get_anon_transfer_message_to_sign(
        &self,
        params: &AnonTransferParams,
    ) -> DefiResult<AnonTransferMessage> {
        self.post("anon-transfer/message", params).await
    }

    async fn send_signed_anon_transfer_params(
        &self,
        params: &SignedAnonTransferParams,
    ) -> DefiResult<String> {
        let receipt: AnonTransferReceipt = self.post("anon-transfer/submit", params).await?;
        Ok(receipt.into_signature())
    }
}
