//! Hashing and key derivation.
//!
//! Two primitives back the protocol:
//!
//! - SHA-256, which prehashes every signed message
//! - HMAC-SHA256 keyed with zeros, which turns a Diffie-Hellman point into
//!   the shared offset `c`
//!
//! ## KDF
//!
//! ```text
//! c = HMAC-SHA256(key = 0x00 * kdf_key_len, SEC1_compressed(shared_point))
//! ```
//!
//! HMAC zero-pads short keys to the 64-byte block, so any all-zero key of
//! length 0..=64 yields the same MAC.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use shade_core::constants::{DIGEST_SIZE, SHARED_SECRET_SIZE};
use shade_core::error::{Result, ShadeError};
use shade_core::types::{CompressedPoint, SharedSecret};

type HmacSha256 = Hmac<Sha256>;

// ═══════════════════════════════════════════════════════════════════════════════
// DIGESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes SHA-256.
pub fn sha256(input: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha256::digest(input).into()
}

/// Computes HMAC-SHA256.
///
/// # Errors
/// Only if the MAC rejects the key length, which HMAC never does.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| ShadeError::InternalError(format!("HMAC key rejected: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().into())
}

// ═══════════════════════════════════════════════════════════════════════════════
// KDF
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives the shared secret from a Diffie-Hellman point.
///
/// The result is raw digest bytes; range checking against the group order
/// happens when the protocol turns it into a scalar.
///
/// # Example
///
/// ```rust,ignore
/// let domain = CurveDomain::secp256k1();
/// let secret = derive_shared_secret(domain.kdf_key(), &shared_point)?;
/// ```
pub fn derive_shared_secret(kdf_key: &[u8], shared_point: &CompressedPoint) -> Result<SharedSecret> {
    let digest: [u8; SHARED_SECRET_SIZE] = hmac_sha256(kdf_key, shared_point.as_bytes())?;
    Ok(SharedSecret::from_array(digest))
}
