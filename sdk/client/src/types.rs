//! SDK value objects.
//!
//! Field names follow the SDK's camelCase JSON. Public keys travel as base58
//! strings. Objects the SDK treats as opaque keep unknown fields in `extra`
//! so they can be echoed back unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::amount;
use crate::error::DefiResult;
use crate::txn;

// ============================================================================
// Network / Tokens
// ============================================================================

/// Which Encifher deployment the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    #[default]
    Mainnet,
    Devnet,
}

impl NetworkMode {
    /// Value sent to the SDK service.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkMode::Mainnet => "Mainnet",
            NetworkMode::Devnet => "Devnet",
        }
    }
}

impl FromStr for NetworkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(NetworkMode::Mainnet),
            "devnet" => Ok(NetworkMode::Devnet),
            other => Err(format!("unknown network mode: {other}")),
        }
    }
}

/// A fungible token: mint address plus decimal precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub token_mint_address: String,
    pub decimals: u8,
}

impl Token {
    /// "0.1" -> "100000" for a 6-decimal token.
    pub fn to_base_units(&self, ui_amount: &str) -> DefiResult<String> {
        amount::to_base_units(ui_amount, self.decimals)
    }

    pub fn to_ui_amount(&self, base_units: &str) -> DefiResult<String> {
        amount::to_ui_amount(base_units, self.decimals)
    }
}

/// One entry of a user's token mint listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMint {
    pub mint: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Deposit / Withdraw
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositParams {
    pub token: Token,
    #[serde(with = "b58")]
    pub depositor: Pubkey,
    /// Base-unit amount
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawParams {
    pub token: Token,
    #[serde(with = "b58")]
    pub withdrawer: Pubkey,
    /// Base-unit amount
    pub amount: String,
    /// Defaults to the withdrawer on the SDK side
    #[serde(default, with = "b58::option", skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Pubkey>,
}

/// Envelope the SDK wraps unsigned transactions in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxnEnvelope {
    pub serialized_txn: String,
}

// ============================================================================
// Swap
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteParams {
    pub in_mint: String,
    pub out_mint: String,
    pub amount_in: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_out: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for SwapQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub in_mint: String,
    pub out_mint: String,
    pub amount_in: String,
    #[serde(with = "b58")]
    pub sender_pubkey: Pubkey,
    #[serde(with = "b58")]
    pub receiver_pubkey: Pubkey,
}

impl SwapParams {
    pub fn quote_params(&self) -> SwapQuoteParams {
        SwapQuoteParams {
            in_mint: self.in_mint.clone(),
            out_mint: self.out_mint.clone(),
            amount_in: self.amount_in.clone(),
        }
    }
}

/// A signed (not broadcast) swap transaction plus the order it encodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedSwapParams {
    /// base64(bincode(transaction))
    pub serialized_txn: String,
    pub order_details: SwapParams,
}

impl SignedSwapParams {
    pub fn new(signed_txn: &Transaction, order_details: SwapParams) -> DefiResult<Self> {
        Ok(Self {
            serialized_txn: txn::encode_transaction(signed_txn)?,
            order_details,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteSwapResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status_identifier: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusParams {
    pub order_status_identifier: String,
}

/// Execution state of a submitted swap order. Only `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Pending,
    Completed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderState::Pending => "pending",
            OrderState::Completed => "completed",
            OrderState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub status: OrderState,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderStatus {
    pub fn is_completed(&self) -> bool {
        self.status == OrderState::Completed
    }
}

// ============================================================================
// Signed balance read
// ============================================================================

/// Message the SDK wants signed before it will reveal balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageToSign {
    pub msg_hash: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{ signature, ...payload }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedMessage {
    /// base64 detached signature over the UTF-8 bytes of `msg_hash`
    pub signature: String,
    #[serde(flatten)]
    pub payload: MessageToSign,
}

// ============================================================================
// Anonymous transfer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonTransferParams {
    #[serde(with = "b58")]
    pub sender: Pubkey,
    #[serde(with = "b58")]
    pub receiver: Pubkey,
    /// Base-unit amount
    pub amount: String,
    pub token_mint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonTransferMessage {
    pub msg_hash: String,
    /// Opaque; handed back unchanged with the signature
    pub extended_anon_transfer_params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedAnonTransferParams {
    /// base58 detached signature over the UTF-8 bytes of `msg_hash`
    pub signature: String,
    pub extended_anon_transfer_params: Value,
}

/// The SDK answers an anonymous transfer with either a bare signature string
/// or an object carrying it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum AnonTransferReceipt {
    Bare(String),
    Wrapped {
        #[serde(alias = "txnSignature", alias = "txSignature")]
        signature: String,
    },
}

impl AnonTransferReceipt {
    pub(crate) fn into_signature(self) -> String {
        match self {
            AnonTransferReceipt::Bare(s) => s,
            AnonTransferReceipt::Wrapped { signature } => signature,
        }
    }
}

// ============================================================================
// Pubkey <-> base58 string
// ============================================================================

pub(crate) mod b58 {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(key: &Pubkey, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(key)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(d)?;
        Pubkey::from_str(&s).map_err(D::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(key: &Option<Pubkey>, s: S) -> Result<S::Ok, S::Error> {
            match key {
                Some(k) => s.collect_str(k),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Pubkey>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|s| Pubkey::from_str(&s).map_err(D::Error::custom))
                .transpose()
        }
    }
}
