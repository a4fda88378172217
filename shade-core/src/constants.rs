//! Protocol constants for SHADE.
//!
//! All cryptographic sizes are derived from secp256k1 (SEC 2) and SHA-256.

// ═══════════════════════════════════════════════════════════════════════════════
// SECP256K1 SIZES (SEC 2)
// ═══════════════════════════════════════════════════════════════════════════════

/// Name of the only supported curve.
pub const CURVE_NAME: &str = "secp256k1";

/// Size of a serialized scalar (private key, shared offset) in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Size of a SEC1 compressed point: parity tag + x-coordinate.
pub const COMPRESSED_POINT_SIZE: usize = 1 + SCALAR_SIZE;

/// SEC1 tag for a compressed point with even y.
pub const COMPRESSED_TAG_EVEN: u8 = 0x02;

/// SEC1 tag for a compressed point with odd y.
pub const COMPRESSED_TAG_ODD: u8 = 0x03;

/// Order `n` of the secp256k1 base point, big-endian.
pub const GROUP_ORDER: [u8; SCALAR_SIZE] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

// ═══════════════════════════════════════════════════════════════════════════════
// HASH / KDF SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a SHA-256 digest; matches the curve's scalar size.
pub const DIGEST_SIZE: usize = 32;

/// SHA-256 block size. HMAC zero-pads shorter keys to this length, so every
/// all-zero KDF key up to this size produces the same output.
pub const HMAC_BLOCK_SIZE: usize = 64;

/// Default length of the all-zero HMAC key used by the KDF.
pub const DEFAULT_KDF_KEY_LEN: usize = HMAC_BLOCK_SIZE;

/// Size of the KDF output.
pub const SHARED_SECRET_SIZE: usize = DIGEST_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// ENCODING SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Width of the fixed-width big-endian number encoding.
pub const FIXED_WIDTH_SIZE: usize = 8;

/// Largest DER ECDSA signature over a 256-bit curve:
/// SEQUENCE header (2) + 2 × (INTEGER header (2) + sign pad (1) + 32).
pub const MAX_DER_SIGNATURE_SIZE: usize = 72;

// ═══════════════════════════════════════════════════════════════════════════════
// DOMAIN SEPARATORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Domain separator prefixed to spend-authorization messages.
pub const DOMAIN_SPEND_AUTH: &[u8] = b"SHADE_SPEND_AUTH_V1";

// ═══════════════════════════════════════════════════════════════════════════════
// PROTOCOL VERSIONING
// ═══════════════════════════════════════════════════════════════════════════════

/// Current protocol version.
/// Increment when making breaking changes to serialization formats.
pub const PROTOCOL_VERSION: u8 = 1;

/// Size of a serialized [`ReceiverAddress`](crate::ReceiverAddress).
/// 1 + 33 + 33 = 67 bytes
pub const RECEIVER_ADDRESS_SERIALIZED_SIZE: usize =
    1 + COMPRESSED_POINT_SIZE + COMPRESSED_POINT_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Environment variable overriding the KDF key length.
pub const ENV_KDF_KEY_LEN: &str = "SHADE_KDF_KEY_LEN";

/// Environment variable selecting the ECDSA nonce mode.
pub const ENV_NONCE_MODE: &str = "SHADE_NONCE_MODE";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secp256k1_sizes() {
        assert_eq!(SCALAR_SIZE, 32);
        assert_eq!(COMPRESSED_POINT_SIZE, 33);
        assert_eq!(DIGEST_SIZE, SCALAR_SIZE);
    }

    #[test]
    fn test_group_order_prefix() {
        assert_eq!(&GROUP_ORDER[..4], &[0xFF; 4]);
        assert_eq!(GROUP_ORDER[SCALAR_SIZE - 1], 0x41);
    }

    #[test]
    fn test_receiver_address_size() {
        // version (1) + scan_pk (33) + spend_pk (33)
        assert_eq!(RECEIVER_ADDRESS_SERIALIZED_SIZE, 67);
    }

    #[test]
    fn test_max_der_size() {
        assert_eq!(MAX_DER_SIGNATURE_SIZE, 2 + 2 * (2 + 1 + 32));
    }
}
