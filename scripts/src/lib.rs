//! Encifher Scripts
//!
//! Demo programs for the Encifher swap SDK on Solana. The binaries under
//! `src/bin` are thin wrappers over the scenarios in [`demos`].
//!
//! - [`flows`]: one business action each (deposit, withdraw, swap, balance, anonymous transfer)
//! - [`chain`]: co-signing and broadcasting SDK-built transactions
//! - [`poll`]: order status polling
//! - [`balance`]: signed balance reads

pub mod balance;
pub mod chain;
pub mod cli;
pub mod demos;
pub mod flows;
pub mod output;
pub mod poll;
