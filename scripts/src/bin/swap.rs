//! Confidential swap
//!
//! Quote, build, sign and execute a swap through the SDK, poll the order
//! until it completes, then read both balances.
//!
//! Usage:
//!   cargo run --bin swap -- --amount 0.5
//!   cargo run --bin swap -- --amount 0.5 --token-in usdt --token-out usdc

use clap::Parser;
use encifher_scripts::cli::{CommonArgs, base_units, connect, init_logging, load_config};
use encifher_scripts::demos::run_swap;

#[derive(Parser, Debug)]
#[command(name = "swap", about = "Swap tokens through the Encifher SDK")]
struct Args {
    /// Amount of --token-in in UI units
    #[arg(long, default_value = "0.5")]
    amount: String,

    /// Token symbol to sell
    #[arg(long, default_value = "usdc")]
    token_in: String,

    /// Token symbol to buy
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
    let amount = base_units(&token_in, &args.amount)?;
    let session = connect(&config)?;

    let report = run_swap(&session, &token_in, &token_out, &amount).await;
    report.print_summary();
    Ok(())
}
