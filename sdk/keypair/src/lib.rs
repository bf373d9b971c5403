//! Encifher Keypair
//!
//! Ed25519 identity used for two things:
//! - partially signing SDK-built Solana transactions (via [`Keypair::solana_keypair`])
//! - detached signatures over SDK-supplied message hashes (balance reads, anonymous transfers)
//!
//! Secrets are accepted in the forms test identities are usually stored in:
//! base58 or base64 strings, or a Solana CLI style JSON byte array. Each may hold
//! either the full 64-byte keypair (`secret || public`) or just the 32-byte seed.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::{fs, fs::OpenOptions};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const SEED_LEN: usize = 32;
const KEYPAIR_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum KeypairError {
    #[error("secret key is empty")]
    Empty,

    #[error("secret key is not valid {0}")]
    Encoding(SecretEncoding),

    #[error("expected 32 or 64 secret bytes, got {0}")]
    InvalidLength(usize),

    #[error("public half of the keypair does not match its secret")]
    PublicKeyMismatch,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("keypair file is not a JSON byte array: {0}")]
    Json(#[from] serde_json::Error),

    #[error("signature verification failed: {0}")]
    Signature(#[from] ed25519_dalek::SignatureError),

    #[error("failed to build Solana keypair: {0}")]
    Solana(String),
}

/// How a stored secret is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretEncoding {
    /// JSON byte array if it looks like one, otherwise base58, then base64.
    #[default]
    Auto,
    Base58,
    Base64,
    Json,
}

impl fmt::Display for SecretEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SecretEncoding::Auto => "auto",
            SecretEncoding::Base58 => "base58",
            SecretEncoding::Base64 => "base64",
            SecretEncoding::Json => "json",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for SecretEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SecretEncoding::Auto),
            "base58" | "bs58" => Ok(SecretEncoding::Base58),
            "base64" | "b64" => Ok(SecretEncoding::Base64),
            "json" => Ok(SecretEncoding::Json),
            other => Err(format!("unknown secret encoding: {other}")),
        }
    }
}

/// A detached ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DetachedSignature(pub [u8; 64]);

impl DetachedSignature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Encoding expected by the SDK's balance endpoint.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Encoding expected by the SDK's anonymous transfer endpoint.
    pub fn to_bs58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// Verifies this signature over `message` against `pubkey`.
    pub fn verify(&self, pubkey: &Pubkey, message: &[u8]) -> Result<(), KeypairError> {
        let key = VerifyingKey::from_bytes(&pubkey.to_bytes())?;
        key.verify(message, &Signature::from_bytes(&self.0))?;
        Ok(())
    }
}

impl AsRef<[u8]> for DetachedSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A user's signing identity.
/// NEVER expose this struct's internals.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a fresh random keypair.
    pub fn new_random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Builds a keypair from raw secret bytes: a 32-byte seed or a 64-byte
    /// `secret || public` keypair. The public half of a 64-byte keypair must match.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        match bytes.len() {
            SEED_LEN => {
                let seed: [u8; SEED_LEN] = bytes
                    .try_into()
                    .map_err(|_| KeypairError::InvalidLength(bytes.len()))?;
                Ok(Self::from_seed(&seed))
            }
            KEYPAIR_LEN => {
                let seed: [u8; SEED_LEN] = bytes[..SEED_LEN]
                    .try_into()
                    .map_err(|_| KeypairError::InvalidLength(bytes.len()))?;
                let keypair = Self::from_seed(&seed);
                if keypair.signing_key.verifying_key().as_bytes() != &bytes[SEED_LEN..] {
                    return Err(KeypairError::PublicKeyMismatch);
                }
                Ok(keypair)
            }
            n => Err(KeypairError::InvalidLength(n)),
        }
    }

    /// Decodes a stored secret string.
    pub fn decode(secret: &str, encoding: SecretEncoding) -> Result<Self, KeypairError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(KeypairError::Empty);
        }

        match encoding {
            SecretEncoding::Base58 => Self::from_bytes(&decode_bs58(secret)?),
            SecretEncoding::Base64 => Self::from_bytes(&decode_base64(secret)?),
            SecretEncoding::Json => {
                let bytes: Vec<u8> = serde_json::from_str(secret)?;
                Self::from_bytes(&bytes)
            }
            SecretEncoding::Auto => {
                if secret.starts_with('[') {
                    return Self::decode(secret, SecretEncoding::Json);
                }
                // A base64 string can also be valid base58, so only accept the
                // base58 reading when it yields a plausible key length.
                match decode_bs58(secret) {
                    Ok(bytes) if bytes.len() == SEED_LEN || bytes.len() == KEYPAIR_LEN => {
                        Self::from_bytes(&bytes)
                    }
                    _ => Self::from_bytes(&decode_base64(secret)?),
                }
            }
        }
    }

    /// Loads a Solana CLI style keypair file (JSON array of 64 bytes).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, KeypairError> {
        let data = fs::read_to_string(path)?;
        Self::decode(&data, SecretEncoding::Json)
    }

    /// Writes the keypair as a JSON byte array, refusing to overwrite.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KeypairError> {
        let path = path.as_ref();
        let json = serde_json::to_string(&self.to_bytes().to_vec())?;

        let mut f = OpenOptions::new().write(true).create_new(true).open(path)?;

        #[cfg(unix)]
        {
            // chmod 600 (rw-------)
            let mut perms = f.metadata()?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        f.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.signing_key.verifying_key().to_bytes())
    }

    /// `secret || public`, the layout Solana tooling uses.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }

    /// The same identity as a Solana SDK keypair, for transaction signing.
    pub fn solana_keypair(&self) -> Result<solana_sdk::signature::Keypair, KeypairError> {
        solana_sdk::signer::keypair::keypair_from_seed(&self.signing_key.to_bytes())
            .map_err(|e| KeypairError::Solana(e.to_string()))
    }

    pub fn sign(&self, message: &[u8]) -> DetachedSignature {
        DetachedSignature(self.signing_key.sign(message).to_bytes())
    }

    /// Signs the UTF-8 bytes of a message hash handed out by the SDK.
    pub fn sign_message_hash(&self, msg_hash: &str) -> DetachedSignature {
        self.sign(msg_hash.as_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

fn decode_bs58(secret: &str) -> Result<Vec<u8>, KeypairError> {
    bs58::decode(secret)
        .into_vec()
        .map_err(|_| KeypairError::Encoding(SecretEncoding::Base58))
}

fn decode_base64(secret: &str) -> Result<Vec<u8>, KeypairError> {
    BASE64
        .decode(secret)
        .map_err(|_| KeypairError::Encoding(SecretEncoding::Base64))
}
