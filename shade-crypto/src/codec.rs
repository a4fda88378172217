//! Fixed-width big-endian integer encoding.
//!
//! Every integer that goes into a signed message is written as exactly
//! [`FIXED_WIDTH_SIZE`] bytes, left-padded with zeros. A value whose minimal
//! unsigned big-endian form needs more bytes than that is rejected rather
//! than truncated.

use shade_core::constants::FIXED_WIDTH_SIZE;
use shade_core::error::{Result, ShadeError};

/// Encodes an integer as 8 big-endian bytes.
///
/// # Errors
/// `EncodingError` if `value >= 2^64`.
pub fn encode(value: u128) -> Result<[u8; FIXED_WIDTH_SIZE]> {
    encode_be_bytes(&value.to_be_bytes())
}

/// Encodes an arbitrary-width big-endian magnitude as 8 bytes.
///
/// Leading zero bytes do not count towards the width.
pub fn encode_be_bytes(magnitude: &[u8]) -> Result<[u8; FIXED_WIDTH_SIZE]> {
    let first_nonzero = magnitude
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(magnitude.len());
    let minimal = &magnitude[first_nonzero..];

    if minimal.len() > FIXED_WIDTH_SIZE {
        return Err(ShadeError::EncodingError {
            width: minimal.len(),
            max: FIXED_WIDTH_SIZE,
        });
    }

    let mut out = [0u8; FIXED_WIDTH_SIZE];
    out[FIXED_WIDTH_SIZE - minimal.len()..].copy_from_slice(minimal);
    Ok(out)
}

/// Encodes a `u64`; always fits.
pub fn encode_u64(value: u64) -> [u8; FIXED_WIDTH_SIZE] {
    value.to_be_bytes()
}

/// Decodes 8 big-endian bytes.
pub fn decode(bytes: &[u8; FIXED_WIDTH_SIZE]) -> u64 {
    u64::from_be_bytes(*bytes)
}

/// Decodes a slice that must be exactly 8 bytes long.
pub fn decode_slice(bytes: &[u8]) -> Result<u64> {
    let arr: [u8; FIXED_WIDTH_SIZE] =
        bytes.try_into().map_err(|_| ShadeError::InvalidKeySize {
            expected: FIXED_WIDTH_SIZE,
            actual: bytes.len(),
        })?;
    Ok(decode(&arr))
}
