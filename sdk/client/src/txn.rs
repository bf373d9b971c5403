//! Transaction codec.
//!
//! The SDK hands out and accepts Solana transactions as `base64(bincode(tx))`,
//! the same layout `Transaction::serialize` produces in the JS SDK.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use solana_sdk::transaction::Transaction;

use crate::error::{DefiError, DefiResult};

pub fn decode_transaction(serialized: &str) -> DefiResult<Transaction> {
    let bytes = STANDARD
        .decode(serialized.trim())
        .map_err(|e| DefiError::Transaction(format!("base64: {e}")))?;
    bincode::deserialize(&bytes).map_err(|e| DefiError::Transaction(format!("bincode: {e}")))
}

pub fn encode_transaction(tx: &Transaction) -> DefiResult<String> {
    let bytes =
        bincode::serialize(tx).map_err(|e| DefiError::Transaction(format!("bincode: {e}")))?;
    Ok(STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;
    use solana_sdk::instruction::{AccountMeta, Instruction};
    use solana_sdk::message::Message;
    use solana_sdk::pubkey::Pubkey;

    fn sample_tx() -> Transaction {
        let payer = Pubkey::new_from_array([1u8; 32]);
        let ix = Instruction::new_with_bytes(
            Pubkey::new_from_array([9u8; 32]),
            &[1, 2, 3],
            vec![AccountMeta::new(payer, true)],
        );
        let message = Message::new_with_blockhash(&[ix], Some(&payer), &Hash::new_from_array([7u8; 32]));
        Transaction::new_unsigned(message)
    }

    #[test]
    fn decodes_what_it_encodes() {
        let tx = sample_tx();
        let encoded = encode_transaction(&tx).unwrap();
        let decoded = decode_transaction(&encoded).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.message.account_keys[0], Pubkey::new_from_array([1u8; 32]));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode_transaction("!!not base64!!"),
            Err(DefiError::Transaction(_))
        ));
        assert!(matches!(
            decode_transaction(&STANDARD.encode([1u8, 2, 3])),
            Err(DefiError::Transaction(_))
        ));
    }
}
