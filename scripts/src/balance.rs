//! Signed balance read.

use encifher_client::{DefiApi, DefiResult, SignedMessage};
use encifher_keypair::Keypair;
use log::debug;
use serde_json::Value;

/// Fetch the SDK's challenge, sign its `msg_hash` with `owner` and read
/// `owner`'s balances for `mints`.
pub async fn fetch_signed_balance<A: DefiApi>(
    api: &A,
    owner: &Keypair,
    mints: &[String],
) -> DefiResult<Value> {
    let payload = api.get_message_to_sign().await?;
    debug!("Signing balance challenge {}", payload.msg_hash);

    let signature = owner.sign_message_hash(&payload.msg_hash).to_base64();
    let signed = SignedMessage { signature, payload };

    api.get_balance(&owner.pubkey(), &signed, mints).await
}
