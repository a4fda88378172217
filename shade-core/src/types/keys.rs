//! Key types for SHADE.
//!
//! This module defines the byte-level key material used in the protocol:
//!
//! - [`CompressedPoint`]: SEC1 compressed secp256k1 point (33 bytes)
//! - [`PrivateScalar`]: 32-byte big-endian scalar, zeroized on drop
//! - [`SharedSecret`]: KDF output, zeroized on drop
//!
//! These types only check structure (length, SEC1 tag). Whether a point lies
//! on the curve or a scalar is below the group order is decided by the curve
//! domain in `shade-crypto`.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    COMPRESSED_POINT_SIZE, COMPRESSED_TAG_EVEN, COMPRESSED_TAG_ODD, SCALAR_SIZE,
    SHARED_SECRET_SIZE,
};
use crate::error::{Result, ShadeError};

// ═══════════════════════════════════════════════════════════════════════════════
// COMPRESSED POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// A secp256k1 point in SEC1 compressed form.
///
/// Public keys, shared DH points and one-time addresses all travel as this type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPoint {
    bytes: [u8; COMPRESSED_POINT_SIZE],
}

impl CompressedPoint {
    /// Creates a point from raw bytes.
    ///
    /// # Errors
    /// Returns `InvalidKeySize` if the length is not 33 and `InvalidPointError`
    /// if the leading byte is not a compressed SEC1 tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_POINT_SIZE {
            return Err(ShadeError::InvalidKeySize {
                expected: COMPRESSED_POINT_SIZE,
                actual: bytes.len(),
            });
        }

        if bytes[0] != COMPRESSED_TAG_EVEN && bytes[0] != COMPRESSED_TAG_ODD {
            return Err(ShadeError::InvalidPointError(format!(
                "unexpected SEC1 tag 0x{:02x}",
                bytes[0]
            )));
        }

        let mut arr = [0u8; COMPRESSED_POINT_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a point from a fixed-size array without checking the tag.
    pub fn from_array(bytes: [u8; COMPRESSED_POINT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the point as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; COMPRESSED_POINT_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded point.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Creates a point from a hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for CompressedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompressedPoint({})", self.to_hex())
    }
}

impl std::fmt::Display for CompressedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Serde implementation that uses hex encoding
impl Serialize for CompressedPoint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CompressedPoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE SCALAR
// ═══════════════════════════════════════════════════════════════════════════════

/// A secret scalar: private key, shared offset `c`, or one-time key `c + b`.
///
/// Stored big-endian. Zeroized on drop; never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateScalar {
    bytes: [u8; SCALAR_SIZE],
}

impl PrivateScalar {
    /// Creates a scalar from raw big-endian bytes.
    ///
    /// # Errors
    /// Returns error if bytes length doesn't match `SCALAR_SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_SIZE {
            return Err(ShadeError::InvalidKeySize {
                expected: SCALAR_SIZE,
                actual: bytes.len(),
            });
        }

        let mut arr = [0u8; SCALAR_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a scalar from a fixed-size array.
    pub fn from_array(bytes: [u8; SCALAR_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a small scalar, mostly useful for fixed test vectors.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; SCALAR_SIZE];
        bytes[SCALAR_SIZE - 8..].copy_from_slice(&value.to_be_bytes());
        Self { bytes }
    }

    /// Returns the raw bytes.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the scalar as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; SCALAR_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded scalar (for key export only).
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Creates a scalar from a hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for PrivateScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose secret key content
        write!(f, "PrivateScalar([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED SECRET
// ═══════════════════════════════════════════════════════════════════════════════

/// KDF output over a Diffie-Hellman point. Intermediate only.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_SIZE],
}

impl SharedSecret {
    /// Wraps a digest.
    pub fn from_array(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the secret as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}
