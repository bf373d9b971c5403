//! Withdraw (unwrap) a confidential token balance
//!
//! Usage:
//!   cargo run --bin withdraw -- --amount 0.1
//!   cargo run --bin withdraw -- --amount 0.1 --token usdt --receiver <PUBKEY>
//!
//! Arguments:
//!   --receiver <PUBKEY>  Recipient of the unwrapped tokens (default: the withdrawer)

use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use encifher_scripts::cli::{CommonArgs, TokenArgs, base_units, connect, init_logging, load_config};
use encifher_scripts::demos::run_withdraw;
use solana_sdk::pubkey::Pubkey;

#[derive(Parser, Debug)]
#[command(name = "withdraw", about = "Withdraw a token through the Encifher SDK")]
struct Args {
    /// Amount in UI units
    #[arg(long, default_value = "0.1")]
    amount: String,

    /// Recipient of the withdrawn tokens
    #[arg(long)]
    receiver: Option<String>,

    #[command(flatten)]
    token: TokenArgs,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = load_config(&args.common)?;
    let token = args.token.resolve(&config)?;
    let amount = base_units(&token, &args.amount)?;
    let receiver = args
        .receiver
        .as_deref()
        .map(Pubkey::from_str)
        .transpose()
        .context("Invalid --receiver")?;
    let session = connect(&config)?;

    let report = run_withdraw(&session, &token, &amount, receiver).await;
    report.print_summary();
    Ok(())
}
