//! Address types for SHADE.
//!
//! - [`ReceiverAddress`]: The `(S, B)` pair a receiver publishes
//! - [`AuditGrant`]: The `(s, B)` pair a receiver hands to an auditor

use serde::{Deserialize, Serialize};

use super::{CompressedPoint, PrivateScalar};
use crate::constants::{COMPRESSED_POINT_SIZE, PROTOCOL_VERSION, RECEIVER_ADDRESS_SERIALIZED_SIZE};
use crate::error::{Result, ShadeError};

// ═══════════════════════════════════════════════════════════════════════════════
// RECEIVER ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// The public half of a receiver's dual key: scan key `S` and spend key `B`.
///
/// Senders use this to derive one-time destination addresses.
///
/// # Structure
/// - `version`: Protocol version for forward compatibility
/// - `scan_pk`: `S = s·G`, used for the Diffie-Hellman exchange
/// - `spend_pk`: `B = b·G`, offset by `c·G` to form the one-time address
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverAddress {
    /// Protocol version (for forward compatibility)
    pub version: u8,
    /// Scan public key
    pub scan_pk: CompressedPoint,
    /// Spend public key
    pub spend_pk: CompressedPoint,
}

impl ReceiverAddress {
    /// Creates a new receiver address with the current protocol version.
    pub fn new(scan_pk: CompressedPoint, spend_pk: CompressedPoint) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            scan_pk,
            spend_pk,
        }
    }

    /// Validates the address structure.
    ///
    /// On-curve validation of the two points happens when they are decoded
    /// by the curve domain.
    pub fn validate(&self) -> Result<()> {
        if self.version != PROTOCOL_VERSION {
            return Err(ShadeError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                actual: self.version,
            });
        }

        if self.scan_pk == self.spend_pk {
            return Err(ShadeError::InvalidReceiverAddress(
                "scan and spend keys must differ".into(),
            ));
        }

        Ok(())
    }

    /// Serializes to compact binary format.
    ///
    /// Format: version (1) || scan_pk (33) || spend_pk (33)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(RECEIVER_ADDRESS_SERIALIZED_SIZE);
        bytes.push(self.version);
        bytes.extend_from_slice(self.scan_pk.as_bytes());
        bytes.extend_from_slice(self.spend_pk.as_bytes());
        bytes
    }

    /// Deserializes from compact binary format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RECEIVER_ADDRESS_SERIALIZED_SIZE {
            return Err(ShadeError::InvalidReceiverAddress(format!(
                "expected {} bytes, got {}",
                RECEIVER_ADDRESS_SERIALIZED_SIZE,
                bytes.len()
            )));
        }

        let split = 1 + COMPRESSED_POINT_SIZE;
        let address = Self {
            version: bytes[0],
            scan_pk: CompressedPoint::from_bytes(&bytes[1..split])?,
            spend_pk: CompressedPoint::from_bytes(&bytes[split..])?,
        };

        address.validate()?;
        Ok(address)
    }

    /// Encodes to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decodes from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim().trim_start_matches("0x"))?;
        Self::from_bytes(&bytes)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// AUDIT GRANT
// ═══════════════════════════════════════════════════════════════════════════════

/// What a receiver discloses to an auditor: the scan secret and the spend
/// public key. Enough to recognise payments, not enough to spend them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditGrant {
    /// Scan private key `s`
    #[serde(with = "scalar_hex")]
    pub scan_sk: PrivateScalar,
    /// Spend public key `B`
    pub spend_pk: CompressedPoint,
}

impl AuditGrant {
    /// Creates a grant.
    pub fn new(scan_sk: PrivateScalar, spend_pk: CompressedPoint) -> Self {
        Self { scan_sk, spend_pk }
    }
}

/// Hex (de)serialization for secret scalars, for use with `#[serde(with = "...")]`.
///
/// Only key export formats should use this.
pub mod scalar_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::PrivateScalar;

    /// Serializes a scalar as lowercase hex.
    pub fn serialize<S: Serializer>(
        scalar: &PrivateScalar,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&scalar.to_hex())
    }

    /// Deserializes a scalar from hex, with or without `0x`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<PrivateScalar, D::Error> {
        let s = String::deserialize(deserializer)?;
        PrivateScalar::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
