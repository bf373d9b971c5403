//! Encifher Client
//!
//! Typed surface of the Encifher swap SDK service:
//!
//! - **Value objects** ([`types`]): tokens, deposit/withdraw/swap params, order status,
//!   balance-read and anonymous-transfer payloads, serialized the way the SDK expects
//! - **Collaborator trait** ([`DefiApi`]): one method per SDK operation
//! - **HTTP client** ([`DefiClient`]): the `reqwest` implementation of [`DefiApi`]
//! - **Transaction codec** ([`txn`]): base64/bincode Solana transactions as exchanged with the SDK

pub mod amount;
pub mod api;
pub mod error;
pub mod http;
pub mod txn;
pub mod types;

pub use api::DefiApi;
pub use error::{DefiError, DefiResult};
pub use http::{DefiClient, DefiClientConfig};
pub use types::*;
