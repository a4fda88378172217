//! Domain configuration.
//!
//! A [`DomainConfig`] is built once at start-up (from defaults, JSON or the
//! environment) and handed to the curve domain, which is then shared by `Arc`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_KDF_KEY_LEN, ENV_KDF_KEY_LEN, ENV_NONCE_MODE, HMAC_BLOCK_SIZE};
use crate::error::{Result, ShadeError};

/// How ECDSA nonces are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceMode {
    /// Fresh random nonce per signature (outputs differ per call).
    #[default]
    Randomized,
    /// Deterministic nonce derived from key and digest (RFC 6979).
    Rfc6979,
}

impl FromStr for NonceMode {
    type Err = ShadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "randomized" | "random" => Ok(NonceMode::Randomized),
            "rfc6979" | "deterministic" => Ok(NonceMode::Rfc6979),
            other => Err(ShadeError::ConfigError(format!(
                "unknown nonce mode '{other}'"
            ))),
        }
    }
}

impl fmt::Display for NonceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonceMode::Randomized => f.write_str("randomized"),
            NonceMode::Rfc6979 => f.write_str("rfc6979"),
        }
    }
}

/// Immutable parameters of a SHADE deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Length of the all-zero HMAC key used by the KDF.
    pub kdf_key_len: usize,
    /// ECDSA nonce strategy.
    pub nonce_mode: NonceMode,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            kdf_key_len: DEFAULT_KDF_KEY_LEN,
            nonce_mode: NonceMode::default(),
        }
    }
}

impl DomainConfig {
    /// Loads configuration from the environment (and `.env` if present).
    ///
    /// Unset variables fall back to the defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(raw) = std::env::var(ENV_KDF_KEY_LEN) {
            config.kdf_key_len = raw.trim().parse().map_err(|_| {
                ShadeError::ConfigError(format!("{ENV_KDF_KEY_LEN} must be an integer, got '{raw}'"))
            })?;
        }

        if let Ok(raw) = std::env::var(ENV_NONCE_MODE) {
            config.nonce_mode = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Keys longer than the HMAC block size are hashed by HMAC before use,
    /// which would silently change the KDF, so they are rejected.
    pub fn validate(&self) -> Result<()> {
        if self.kdf_key_len > HMAC_BLOCK_SIZE {
            return Err(ShadeError::ConfigError(format!(
                "kdf_key_len {} exceeds HMAC block size {}",
                self.kdf_key_len, HMAC_BLOCK_SIZE
            )));
        }
        Ok(())
    }

    /// Returns the all-zero KDF key.
    pub fn kdf_key(&self) -> Vec<u8> {
        vec![0u8; self.kdf_key_len]
    }
}
