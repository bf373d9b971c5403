//! Read confidential balances
//!
//! Lists the mints the user holds and reads every balance with a signed
//! request.
//!
//! Usage:
//!   cargo run --bin fetch_balance

use clap::Parser;
use encifher_scripts::cli::{CommonArgs, connect, init_logging, load_config};
use encifher_scripts::demos::run_fetch_balance;

#[derive(Parser, Debug)]
#[command(name = "fetch_balance", about = "Read balances through the Encifher SDK")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = load_config(&args.common)?;
    let session = connect(&config)?;

    let report = run_fetch_balance(&session).await;
    report.print_summary();
    Ok(())
}
