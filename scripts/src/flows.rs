//! Per-action flows: one SDK operation, the signing it needs, and for
//! deposit/withdraw the on-chain submission.
//!
//! Each flow returns its own error; deciding whether to carry on is left to
//! the scenario in [`crate::demos`].

use std::time::Duration;

use anyhow::{Context, Result};
use encifher_client::{
    AnonTransferParams, DefiApi, DefiError, DepositParams, SignedAnonTransferParams,
    SignedSwapParams, SwapParams, SwapQuote, Token, WithdrawParams,
};
use encifher_keypair::Keypair;
use log::info;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::balance::fetch_signed_balance;
use crate::chain::{ChainSubmitter, partial_sign};
use crate::poll::{PollConfig, PollOutcome, poll_order_status};

/// Result of a swap that reached the SDK's order book.
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub order_status_identifier: String,
    pub poll: PollOutcome,
}

/// Everything a flow needs: the SDK, the chain, the acting user and timing.
pub struct Session<A, C> {
    pub api: A,
    pub chain: C,
    pub user: Keypair,
    pub poll: PollConfig,
    pub settle_delay: Duration,
}

impl<A: DefiApi, C: ChainSubmitter> Session<A, C> {
    pub fn new(api: A, chain: C, user: Keypair) -> Self {
        Self {
            api,
            chain,
            user,
            poll: PollConfig::default(),
            settle_delay: Duration::from_secs(5),
        }
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Wrap `amount` (base units) of `token` into its confidential form.
    pub async fn deposit(&self, token: &Token, amount: &str) -> Result<Signature> {
        let params = DepositParams {
            token: token.clone(),
            depositor: self.user.pubkey(),
            amount: amount.to_string(),
        };
        let mut tx = self
            .api
            .get_deposit_txn(&params)
            .await
            .context("Failed to build deposit transaction")?;

        partial_sign(&mut tx, &self.user)?;
        let signature = self
            .chain
            .submit(&tx)
            .await
            .context("Deposit transaction failed")?;
        info!("Deposit successful: {}", signature);
        Ok(signature)
    }

    /// Unwrap `amount` (base units) of `token`, to `receiver` or back to the user.
    pub async fn withdraw(
        &self,
        token: &Token,
        amount: &str,
        receiver: Option<Pubkey>,
    ) -> Result<Signature> {
        let params = WithdrawParams {
            token: token.clone(),
            withdrawer: self.user.pubkey(),
            amount: amount.to_string(),
            receiver,
        };
        let mut tx = self
            .api
            .get_withdraw_txn(&params)
            .await
            .context("Failed to build withdraw transaction")?;

        partial_sign(&mut tx, &self.user)?;
        let signature = self
            .chain
            .submit(&tx)
            .await
            .context("Withdraw transaction failed")?;
        info!("Withdraw successful: {}", signature);
        Ok(signature)
    }

    /// Swap order from the user to themselves.
    pub fn swap_params(&self, token_in: &Token, token_out: &Token, amount_in: &str) -> SwapParams {
        SwapParams {
            in_mint: token_in.token_mint_address.clone(),
            out_mint: token_out.token_mint_address.clone(),
            amount_in: amount_in.to_string(),
            sender_pubkey: self.user.pubkey(),
            receiver_pubkey: self.user.pubkey(),
        }
    }

    pub async fn quote(&self, params: &SwapParams) -> Result<SwapQuote> {
        self.api
            .get_swap_quote(&params.quote_params())
            .await
            .context("Swap quote fetch failed")
    }

    /// Build, sign and hand the swap to the SDK, then wait for the order.
    ///
    /// The signed transaction goes back to the SDK inside [`SignedSwapParams`];
    /// it is never broadcast from here.
    pub async fn swap(&self, params: &SwapParams) -> Result<SwapOutcome> {
        let mut tx = self
            .api
            .get_swap_txn(params)
            .await
            .context("Swap txn generation failed")?;
        partial_sign(&mut tx, &self.user)?;

        let signed = SignedSwapParams::new(&tx, params.clone())?;
        let response = self
            .api
            .execute_swap_txn(&signed)
            .await
            .context("Execute swap failed")?;
        let order_id = response
            .order_status_identifier
            .ok_or(DefiError::MissingField("orderStatusIdentifier"))?;
        info!("Swap submitted, order {}", order_id);

        let poll = poll_order_status(&self.api, &order_id, &self.poll).await;
        Ok(SwapOutcome {
            order_status_identifier: order_id,
            poll,
        })
    }

    /// Balances of `owner` for `mints`, authorized by `owner`'s signature.
    pub async fn balance(&self, owner: &Keypair, mints: &[String]) -> Result<Value> {
        fetch_signed_balance(&self.api, owner, mints)
            .await
            .context("Balance fetch failed")
    }

    /// Mints the user holds confidential balances in.
    pub async fn user_token_mints(&self) -> Result<Vec<String>> {
        let mints = self
            .api
            .get_user_token_mints(&self.user.pubkey())
            .await
            .context("Token mint listing failed")?;
        Ok(mints.into_iter().map(|m| m.mint).collect())
    }

    /// Move `amount` (base units) of `token` to `receiver` without linking the parties on chain.
    /// Returns the SDK's transaction signature.
    pub async fn anon_transfer(&self, receiver: &Pubkey, token: &Token, amount: &str) -> Result<String> {
        let params = AnonTransferParams {
            sender: self.user.pubkey(),
            receiver: *receiver,
            amount: amount.to_string(),
            token_mint: token.token_mint_address.clone(),
        };
        let message = self
            .api
            .get_anon_transfer_message_to_sign(&params)
            .await
            .context("Failed to fetch anon transfer message")?;

        let signed = SignedAnonTransferParams {
            signature: self.user.sign_message_hash(&message.msg_hash).to_bs58(),
            extended_anon_transfer_params: message.extended_anon_transfer_params,
        };
        let signature = self
            .api
            .send_signed_anon_transfer_params(&signed)
            .await
            .context("Anon transfer submission failed")?;
        info!("Anon transfer txn signature: {}", signature);
        Ok(signature)
    }

    /// Give the SDK time to index a wrap/unwrap before reading balances.
    pub async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }
}
