//! Encifher Configuration
//!
//! Shared configuration crate for the Encifher SDK demos.
//!
//! Handles loading configuration from:
//! 1. `.env` in the current directory (loaded into the process environment)
//! 2. ENCIFHER_CONFIG env var (explicit path)
//! 3. ./encifher.toml (current directory)
//! 4. ~/.encifher/config.toml (user home)
//!
//! Environment variables take precedence over TOML config. The loaded config is
//! built once in `main` and handed down by reference.

use anyhow::{Context, Result, bail};
use encifher_client::{DefiClientConfig, NetworkMode, Token};
use encifher_keypair::{Keypair, SecretEncoding};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use std::{env, fs};

const CONFIG_FILE_NAME: &str = "encifher.toml";
const CONFIG_DIR_NAME: &str = ".encifher";
const CONFIG_DIR_FILE_NAME: &str = "config.toml";

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_API_URL: &str = "http://127.0.0.1:8787";
const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 40;
const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
const DEFAULT_SETTLE_DELAY_MS: u64 = 5_000;

pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";
const STABLE_DECIMALS: u8 = 6;

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncifherConfig {
    #[serde(default)]
    pub sdk: SdkConfig,
    #[serde(default)]
    pub solana: SolanaConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default = "default_tokens")]
    pub tokens: BTreeMap<String, TokenEntry>,
}

impl Default for EncifherConfig {
    fn default() -> Self {
        Self {
            sdk: SdkConfig::default(),
            solana: SolanaConfig::default(),
            identity: IdentityConfig::default(),
            timing: TimingConfig::default(),
            tokens: default_tokens(),
        }
    }
}

/// Encifher SDK service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// SDK access key (`SDK_KEY`)
    #[serde(default)]
    pub encifher_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub mode: NetworkMode,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            encifher_key: String::new(),
            api_url: DEFAULT_API_URL.into(),
            mode: NetworkMode::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Solana connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolanaConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
        }
    }
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.into()
}

/// Test identity
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Encoded secret key (`DUMMY_KEY`)
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub key_encoding: SecretEncoding,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("secret_key", &if self.secret_key.is_empty() { "" } else { "<redacted>" })
            .field("key_encoding", &self.key_encoding)
            .finish()
    }
}

/// Waits around off-chain processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Pause after a deposit/withdraw before reading the encrypted balance
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn default_poll_max_attempts() -> u32 {
    DEFAULT_POLL_MAX_ATTEMPTS
}
fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}
fn default_settle_delay() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

/// Token registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    pub mint: String,
    pub decimals: u8,
}

impl TokenEntry {
    pub fn to_token(&self) -> Token {
        Token {
            token_mint_address: self.mint.clone(),
            decimals: self.decimals,
        }
    }
}

fn default_tokens() -> BTreeMap<String, TokenEntry> {
    BTreeMap::from([
        (
            "usdc".to_string(),
            TokenEntry {
                mint: USDC_MINT.into(),
                decimals: STABLE_DECIMALS,
            },
        ),
        (
            "usdt".to_string(),
            TokenEntry {
                mint: USDT_MINT.into(),
                decimals: STABLE_DECIMALS,
            },
        ),
    ])
}

// ============================================================================
// Implementation
// ============================================================================

impl EncifherConfig {
    /// Load configuration from `.env`, config file and env var overrides
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from: {}", path.display());
        }

        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::read_file(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check ENCIFHER_CONFIG env var
        if let Ok(path) = env::var("ENCIFHER_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("ENCIFHER_CONFIG points to a missing file: {}", path.display());
        }

        // 2. Check ./encifher.toml (current directory)
        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        // 3. Check ~/.encifher/config.toml
        Self::default_config_path().filter(|p| p.exists())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, field: &mut String| {
            if let Some(v) = lookup(key) {
                *field = v;
            }
        };

        // SDK
        string("SDK_KEY", &mut self.sdk.encifher_key);
        string("ENCIFHER_API_URL", &mut self.sdk.api_url);
        parse_into(&lookup, "ENCIFHER_MODE", &mut self.sdk.mode);
        parse_into(&lookup, "HTTP_TIMEOUT_SECS", &mut self.sdk.request_timeout_secs);

        // Solana
        string("RPC_URL", &mut self.solana.rpc_url);

        // Identity
        string("DUMMY_KEY", &mut self.identity.secret_key);
        parse_into(&lookup, "DUMMY_KEY_ENCODING", &mut self.identity.key_encoding);

        // Timing
        parse_into(&lookup, "POLL_MAX_ATTEMPTS", &mut self.timing.poll_max_attempts);
        parse_into(&lookup, "POLL_INTERVAL_MS", &mut self.timing.poll_interval_ms);
        parse_into(&lookup, "SETTLE_DELAY_MS", &mut self.timing.settle_delay_ms);
    }

    /// Semantic checks that serde can't express
    pub fn validate(&self) -> Result<()> {
        if self.timing.poll_max_attempts == 0 {
            bail!("timing.poll_max_attempts must be at least 1");
        }
        reqwest::Url::parse(&self.sdk.api_url)
            .with_context(|| format!("Invalid sdk.api_url: {}", self.sdk.api_url))?;
        reqwest::Url::parse(&self.solana.rpc_url)
            .with_context(|| format!("Invalid solana.rpc_url: {}", self.solana.rpc_url))?;
        for (symbol, entry) in &self.tokens {
            Pubkey::from_str(&entry.mint)
                .with_context(|| format!("Invalid mint for token '{symbol}': {}", entry.mint))?;
        }
        if self.sdk.encifher_key.trim().is_empty() {
            log::warn!("SDK_KEY is not set; the SDK client will refuse to start without it");
        }
        Ok(())
    }

    /// Settings for the SDK HTTP client
    pub fn client_config(&self) -> DefiClientConfig {
        DefiClientConfig {
            encifher_key: self.sdk.encifher_key.clone(),
            api_url: self.sdk.api_url.clone(),
            mode: self.sdk.mode,
            timeout: Duration::from_secs(self.sdk.request_timeout_secs),
        }
    }

    /// Decode the configured identity secret
    pub fn identity_keypair(&self) -> Result<Keypair> {
        if self.identity.secret_key.trim().is_empty() {
            bail!("No identity secret configured (set DUMMY_KEY or identity.secret_key)");
        }
        Keypair::decode(&self.identity.secret_key, self.identity.key_encoding).with_context(|| {
            format!(
                "Failed to decode identity secret as {}",
                self.identity.key_encoding
            )
        })
    }

    /// Look up a token by symbol (case-insensitive)
    pub fn token(&self, symbol: &str) -> Result<Token> {
        self.tokens
            .get(&symbol.to_ascii_lowercase())
            .map(TokenEntry::to_token)
            .with_context(|| format!("Unknown token symbol: {symbol}"))
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_DIR_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Set field from a looked-up value if present and parseable
fn parse_into<F, T>(lookup: &F, key: &str, field: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(v) = lookup(key) {
        match v.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => log::warn!("Ignoring unparseable {key}={v}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_defaults() -> EncifherConfig {
        let config = EncifherConfig::default();
        let parsed: EncifherConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.tokens, config.tokens);
        config
    }

    #[test]
    fn test_default_config() {
        let config = with_defaults();
        assert_eq!(config.sdk.api_url, DEFAULT_API_URL);
        assert_eq!(config.solana.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.timing.poll_max_attempts, 40);
        assert_eq!(config.timing.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.timing.settle_delay(), Duration::from_secs(5));
        assert_eq!(config.identity.key_encoding, SecretEncoding::Auto);
        assert_eq!(config.token("USDC").unwrap().token_mint_address, USDC_MINT);
        assert_eq!(config.token("usdt").unwrap().decimals, 6);
        assert!(config.token("bonk").is_err());
    }

    #[test]
    fn test_generate_sample() {
        let sample = EncifherConfig::generate_sample();
        assert!(sample.contains("[sdk]"));
        assert!(sample.contains("[solana]"));
        assert!(sample.contains("[timing]"));
        assert!(sample.contains("[tokens.usdc]"));
    }

    #[test]
    fn test_parse_sample() {
        let sample = EncifherConfig::generate_sample();
        let parsed: EncifherConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.sdk.api_url, DEFAULT_API_URL);
        assert_eq!(parsed.tokens.len(), 2);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SDK_KEY", "sk-test"),
            ("RPC_URL", "http://127.0.0.1:8899"),
            ("DUMMY_KEY", "abc"),
            ("DUMMY_KEY_ENCODING", "base64"),
            ("ENCIFHER_MODE", "devnet"),
            ("POLL_MAX_ATTEMPTS", "5"),
            ("POLL_INTERVAL_MS", "not-a-number"),
            ("SETTLE_DELAY_MS", "0"),
        ]);

        let mut config = with_defaults();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.sdk.encifher_key, "sk-test");
        assert_eq!(config.sdk.mode, NetworkMode::Devnet);
        assert_eq!(config.solana.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.identity.secret_key, "abc");
        assert_eq!(config.identity.key_encoding, SecretEncoding::Base64);
        assert_eq!(config.timing.poll_max_attempts, 5);
        // unparseable values keep the previous setting
        assert_eq!(config.timing.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.timing.settle_delay(), Duration::ZERO);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = with_defaults();
        config.timing.poll_max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = with_defaults();
        config.solana.rpc_url = "not a url".into();
        assert!(config.validate().is_err());

        let mut config = with_defaults();
        config.tokens.insert(
            "bad".into(),
            TokenEntry {
                mint: "xyz".into(),
                decimals: 6,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encifher.toml");
        fs::write(
            &path,
            r#"
[sdk]
api_url = "https://sdk.example.test"
mode = "devnet"

[timing]
poll_interval_ms = 250

[tokens.sol]
mint = "So11111111111111111111111111111111111111112"
decimals = 9
"#,
        )
        .unwrap();

        let config = EncifherConfig::read_file(&path).unwrap();
        assert_eq!(config.sdk.api_url, "https://sdk.example.test");
        assert_eq!(config.sdk.mode, NetworkMode::Devnet);
        assert_eq!(config.timing.poll_interval_ms, 250);
        assert_eq!(config.timing.poll_max_attempts, 40);
        // an explicit [tokens] table replaces the default registry
        assert_eq!(config.token("SOL").unwrap().decimals, 9);
        assert!(config.token("usdc").is_err());
    }

    #[test]
    fn test_identity_keypair() {
        let mut config = with_defaults();
        assert!(config.identity_keypair().is_err());

        let kp = Keypair::from_seed(&[7u8; 32]);
        config.identity.secret_key = bs58::encode(kp.to_bytes()).into_string();
        assert_eq!(config.identity_keypair().unwrap().pubkey(), kp.pubkey());

        config.identity.secret_key = "!!!".into();
        assert!(config.identity_keypair().is_err());
    }

    #[test]
    fn test_client_config() {
        let mut config = with_defaults();
        config.sdk.encifher_key = "sk".into();
        config.sdk.request_timeout_secs = 7;
        let client = config.client_config();
        assert_eq!(client.encifher_key, "sk");
        assert_eq!(client.api_url, DEFAULT_API_URL);
        assert_eq!(client.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_missing_sdk_key_passes_validation_but_not_client() {
        let mut config = with_defaults();
        config.sdk.encifher_key = "  ".into();
        assert!(config.validate().is_ok());
        assert!(matches!(
            encifher_client::DefiClient::new(config.client_config()),
            Err(encifher_client::DefiError::Config(_))
        ));

        config.sdk.encifher_key = "sk".into();
        assert!(encifher_client::DefiClient::new(config.client_config()).is_ok());
    }

    #[test]
    fn test_identity_debug_is_redacted() {
        let identity = IdentityConfig {
            secret_key: "super-secret".into(),
            key_encoding: SecretEncoding::Base58,
        };
        let dbg = format!("{:?}", identity);
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("redacted"));
    }
}
