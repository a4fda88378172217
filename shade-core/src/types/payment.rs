//! Payment types for SHADE.
//!
//! - [`StealthPayment`]: one-time address `C` plus the ephemeral point `R`
//! - [`DerSignature`]: DER-encoded ECDSA signature bytes
//! - [`SpendProof`]: a signature by `c + b` over application data

use serde::{Deserialize, Serialize};

use super::CompressedPoint;
use crate::constants::MAX_DER_SIGNATURE_SIZE;
use crate::error::{Result, ShadeError};

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH PAYMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// What a sender produces for one transaction.
///
/// Funds go to `one_time_address`; `ephemeral_pk` is published alongside so
/// the receiver (or an auditor) can recompute the shared secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StealthPayment {
    /// One-time destination address `C = c·G + B`
    pub one_time_address: CompressedPoint,
    /// Ephemeral public key `R = r·G`
    pub ephemeral_pk: CompressedPoint,
}

impl StealthPayment {
    /// Creates a payment record.
    pub fn new(one_time_address: CompressedPoint, ephemeral_pk: CompressedPoint) -> Self {
        Self {
            one_time_address,
            ephemeral_pk,
        }
    }

    /// Validates the payment structure.
    pub fn validate(&self) -> Result<()> {
        if self.one_time_address == self.ephemeral_pk {
            return Err(ShadeError::InvalidPayment(
                "one-time address equals ephemeral key".into(),
            ));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DER SIGNATURE
// ═══════════════════════════════════════════════════════════════════════════════

/// DER-encoded ECDSA signature: `SEQUENCE { INTEGER r, INTEGER s }`.
///
/// Only the length is checked here; structure is checked when decoding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DerSignature {
    bytes: Vec<u8>,
}

impl DerSignature {
    /// Wraps raw DER bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() > MAX_DER_SIGNATURE_SIZE {
            return Err(ShadeError::SignatureDecodingError(format!(
                "signature length {} outside 1..={}",
                bytes.len(),
                MAX_DER_SIGNATURE_SIZE
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns hex-encoded signature.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Creates from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for DerSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DerSignature({})", self.to_hex())
    }
}

impl Serialize for DerSignature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DerSignature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPEND PROOF
// ═══════════════════════════════════════════════════════════════════════════════

/// Proof that the holder of `c + b` controls a one-time address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendProof {
    /// The one-time address the signature is checked against
    pub one_time_address: CompressedPoint,
    /// The signed application data
    #[serde(with = "hex::serde")]
    pub message: Vec<u8>,
    /// DER signature over `SHA-256(message)`
    pub signature: DerSignature,
}
