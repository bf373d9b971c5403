//! Anonymous transfer
//!
//! Sends a confidential balance to a receiver without linking the two on
//! chain, then reads the receiver's balance with the receiver's key.
//!
//! Usage:
//!   cargo run --bin anon_transfer -- --amount 0.1
//!   cargo run --bin anon_transfer -- --to receiver.json
//!   cargo run --bin anon_transfer -- --save-receiver receiver.json
//!
//! Arguments:
//!   --to <PATH>             Receiver keypair file (default: a fresh keypair)
//!   --save-receiver <PATH>  Write the fresh receiver keypair here

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use encifher_keypair::Keypair;
use encifher_scripts::cli::{CommonArgs, TokenArgs, base_units, connect, init_logging, load_config};
use encifher_scripts::demos::run_anon_transfer;
use encifher_scripts::output::print_info;

#[derive(Parser, Debug)]
#[command(name = "anon_transfer", about = "Anonymous transfer through the Encifher SDK")]
struct Args {
    /// Amount in UI units
    #[arg(long, default_value = "0.1")]
    amount: String,

    /// Receiver keypair file
    #[arg(long, conflicts_with = "save_receiver")]
    to: Option<PathBuf>,

    /// Save the generated receiver keypair to this file
    #[arg(long)]
    save_receiver: Option<PathBuf>,

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

    let receiver = match &args.to {
        Some(path) => Keypair::from_file(path)
            .with_context(|| format!("Failed to load receiver keypair {}", path.display()))?,
        None => {
            let receiver = Keypair::new_random();
            if let Some(path) = &args.save_receiver {
                receiver
                    .write_file(path)
                    .with_context(|| format!("Failed to save receiver keypair {}", path.display()))?;
                print_info(&format!("Receiver keypair saved to {}", path.display()));
            }
            receiver
        }
    };

    let session = connect(&config)?;
    let report = run_anon_transfer(&session, &receiver, &token, &amount).await;
    report.print_summary();
    Ok(())
}
