//! Setup shared by the demo binaries: argument groups, logging, config and
//! the live SDK/RPC session.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use encifher_client::{DefiClient, Token};
use encifher_config::EncifherConfig;
use log::info;

use crate::chain::SolanaChain;
use crate::flows::Session;
use crate::poll::PollConfig;

pub type LiveSession = Session<DefiClient, SolanaChain>;

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Config file (default: ./encifher.toml, then ~/.encifher/config.toml)
    #[arg(long, env = "ENCIFHER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// A token picked from the config registry or given as a raw mint.
#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Token symbol from the config registry
    #[arg(long, default_value = "usdc")]
    pub token: String,

    /// Raw mint address, overrides --token
    #[arg(long, requires = "decimals")]
    pub mint: Option<String>,

    /// Decimals of --mint
    #[arg(long)]
    pub decimals: Option<u8>,
}

impl TokenArgs {
    pub fn resolve(&self, config: &EncifherConfig) -> Result<Token> {
        match (&self.mint, self.decimals) {
            (Some(mint), Some(decimals)) => Ok(Token {
                token_mint_address: mint.clone(),
                decimals,
            }),
            _ => config.token(&self.token),
        }
    }
}

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

pub fn load_config(args: &CommonArgs) -> Result<EncifherConfig> {
    match &args.config {
        Some(path) => EncifherConfig::load_from(path),
        None => EncifherConfig::load(),
    }
}

/// SDK client, RPC client and identity from `config`.
pub fn connect(config: &EncifherConfig) -> Result<LiveSession> {
    let user = config.identity_keypair()?;
    let api = DefiClient::new(config.client_config()).context("Failed to create SDK client")?;
    let chain = SolanaChain::new(&config.solana.rpc_url);

    info!("SDK: {} ({})", config.sdk.api_url, config.sdk.mode.as_str());
    info!("RPC: {}", config.solana.rpc_url);

    Ok(Session::new(api, chain, user)
        .with_poll(PollConfig::from(&config.timing))
        .with_settle_delay(config.timing.settle_delay()))
}

/// UI amount ("0.1") to the token's base units, with a readable error.
pub fn base_units(token: &Token, ui_amount: &str) -> Result<String> {
    token
        .to_base_units(ui_amount)
        .with_context(|| format!("Invalid amount for {} decimals", token.decimals))
}
