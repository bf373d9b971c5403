//! Chain Submitter
//!
//! Co-signs SDK-built Solana transactions with the user's key and broadcasts
//! them. The SDK has already filled in the blockhash and its own signatures;
//! only the user's slot is left empty.

use std::time::Duration;

use encifher_keypair::{Keypair, KeypairError};
use log::{debug, info, warn};
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::signer::SignerError;
use solana_sdk::transaction::{Transaction, TransactionError};
use thiserror::Error;

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Keypair error: {0}")]
    Keypair(#[from] KeypairError),

    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    #[error("RPC error: {0}")]
    Rpc(#[from] ClientError),

    #[error("Transaction {signature} failed: {error}")]
    Transaction {
        signature: Signature,
        error: TransactionError,
    },

    #[error("Transaction {0} was not confirmed before its blockhash expired")]
    Expired(Signature),
}

// ============================================================================
// Signing
// ============================================================================

/// Add `signer`'s signature to `tx`, keeping signatures already present.
///
/// Fails if `signer` is not one of the transaction's required signers.
pub fn partial_sign(tx: &mut Transaction, signer: &Keypair) -> Result<(), ChainError> {
    let keypair = signer.solana_keypair()?;
    let blockhash = tx.message.recent_blockhash;
    tx.try_partial_sign(&[&keypair], blockhash)?;
    Ok(())
}

// ============================================================================
// Submission
// ============================================================================

#[allow(async_fn_in_trait)]
pub trait ChainSubmitter {
    /// Broadcast a fully signed transaction and wait for confirmation.
    async fn submit(&self, tx: &Transaction) -> Result<Signature, ChainError>;
}

/// [`ChainSubmitter`] backed by a Solana JSON-RPC node.
pub struct SolanaChain {
    rpc: RpcClient,
    confirm_interval: Duration,
}

impl SolanaChain {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed()),
            confirm_interval: CONFIRM_POLL_INTERVAL,
        }
    }

    /// Delay between confirmation status checks
    pub fn with_confirm_interval(mut self, interval: Duration) -> Self {
        self.confirm_interval = interval;
        self
    }

    /// Wait until `signature` is confirmed, failed on chain, or can no longer
    /// land because `blockhash` expired.
    async fn confirm(&self, signature: &Signature, blockhash: &Hash) -> Result<(), ChainError> {
        let confirmed = CommitmentConfig::confirmed();
        loop {
            if self.check_status(signature).await? {
                return Ok(());
            }

            if !self.rpc.is_blockhash_valid(blockhash, confirmed).await? {
                // it may have landed between the two calls
                if self.check_status(signature).await? {
                    return Ok(());
                }
                warn!("Blockhash {} expired before {} confirmed", blockhash, signature);
                return Err(ChainError::Expired(*signature));
            }

            tokio::time::sleep(self.confirm_interval).await;
        }
    }

    /// `true` once confirmed, an error if the transaction failed on chain.
    async fn check_status(&self, signature: &Signature) -> Result<bool, ChainError> {
        let status = self
            .rpc
            .get_signature_status_with_commitment(signature, CommitmentConfig::confirmed())
            .await?;
        match status {
            Some(Ok(())) => Ok(true),
            Some(Err(error)) => Err(ChainError::Transaction {
                signature: *signature,
                error,
            }),
            None => Ok(false),
        }
    }
}

impl ChainSubmitter for SolanaChain {
    async fn submit(&self, tx: &Transaction) -> Result<Signature, ChainError> {
        // Preflight must not run against a node behind the SDK's view of the chain
        let min_context_slot = self
            .rpc
            .get_slot_with_commitment(CommitmentConfig::confirmed())
            .await?;
        debug!("Sending transaction with min_context_slot={}", min_context_slot);

        let config = RpcSendTransactionConfig {
            preflight_commitment: Some(CommitmentLevel::Confirmed),
            min_context_slot: Some(min_context_slot),
            ..RpcSendTransactionConfig::default()
        };
        let signature = self.rpc.send_transaction_with_config(tx, config).await?;
        info!("Transaction sent: {}", signature);

        self.confirm(&signature, &tx.message.recent_blockhash).await?;
        info!("Transaction confirmed: {}", signature);

        Ok(signature)
    }
}
