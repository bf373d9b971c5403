//! Full SDK walkthrough
//!
//! Deposit, withdraw, swap quote, swap, order polling and a final balance
//! read, in that order. A failing step is reported and the walkthrough
//! continues.
//!
//! Usage:
//!   cargo run --bin full_flow
//!   cargo run --bin full_flow -- --deposit 1 --withdraw 0.1 --swap 0.5

use clap::Parser;
use encifher_scripts::cli::{CommonArgs, base_units, connect, init_logging, load_config};
use encifher_scripts::demos::{FullFlowAmounts, run_full};

#[derive(Parser, Debug)]
#[command(name = "full_flow", about = "Run every Encifher SDK operation in sequence")]
struct Args {
    /// Amount to deposit, in UI units of --token-in
    #[arg(long, default_value = "1")]
    deposit: String,

    /// Amount to withdraw, in UI units of --token-in
    #[arg(long, default_value = "0.1")]
    withdraw: String,

    /// Amount to swap, in UI units of --token-in
    #[arg(long, default_value = "0.5")]
    swap: String,

    #[arg(long, default_value = "usdc")]
    token_in: String,

    #[arg(long, default_value = "usdt")]
    token_out: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = load_config(&args.common)?;
    let token_in = config.token(&args.token_in)?;
    let token_out = config.token(&args.token_out)?;
    let amounts = FullFlowAmounts {
        deposit: base_units(&token_in, &args.deposit)?,
        withdraw: base_units(&token_in, &args.withdraw)?,
        swap: base_units(&token_in, &args.swap)?,
    };
    let session = connect(&config)?;

    let report = run_full(&session, &token_in, &token_out, &amounts).await;
    report.print_summary();
    Ok(())
}
