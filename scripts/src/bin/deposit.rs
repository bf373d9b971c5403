//! Deposit (wrap) a token into its confidential form
//!
//! Builds the deposit transaction through the SDK, co-signs it with the
//! configured identity, broadcasts it and then reads the new balance.
//!
//! Usage:
//!   cargo run --bin deposit -- --amount 0.1
//!   cargo run --bin deposit -- --amount 1 --token usdt
//!
//! Environment variables:
//!   SDK_KEY, RPC_URL, DUMMY_KEY (see encifher-config for the full list)

use clap::Parser;
use encifher_scripts::cli::{CommonArgs, TokenArgs, base_units, connect, init_logging, load_config};
use encifher_scripts::demos::run_deposit;

#[derive(Parser, Debug)]
#[command(name = "deposit", about = "Deposit a token through the Encifher SDK")]
struct Args {
    /// Amount in UI units
    #[arg(long, default_value = "0.1")]
    amount: String,

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
    let session = connect(&config)?;

    let report = run_deposit(&session, &token, &amount).await;
    report.print_summary();
    Ok(())
}
