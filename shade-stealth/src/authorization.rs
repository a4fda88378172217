//! Canonical spend authorization messages.
//!
//! The message a receiver signs with a one-time key when spending:
//!
//! ```text
//! DOMAIN_SPEND_AUTH || C (33) || amount (8, big-endian) || nonce (8, big-endian)
//! ```
//!
//! Integers go through the fixed-width codec, so an amount that does not fit
//! in 8 bytes is an `EncodingError` rather than a silently truncated value.

use serde::{Deserialize, Serialize};

use shade_core::constants::{COMPRESSED_POINT_SIZE, DOMAIN_SPEND_AUTH, FIXED_WIDTH_SIZE};
use shade_core::error::{Result, ShadeError};
use shade_core::types::CompressedPoint;
use shade_crypto::codec;

const MESSAGE_SIZE: usize = DOMAIN_SPEND_AUTH.len() + COMPRESSED_POINT_SIZE + 2 * FIXED_WIDTH_SIZE;

/// Authorization to move `amount` out of a one-time address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendAuthorization {
    /// The one-time address being spent from
    pub one_time_address: CompressedPoint,
    /// Amount in the smallest unit
    pub amount: u128,
    /// Replay counter
    pub nonce: u64,
}

impl SpendAuthorization {
    /// Creates an authorization.
    pub fn new(one_time_address: CompressedPoint, amount: u128, nonce: u64) -> Self {
        Self {
            one_time_address,
            amount,
            nonce,
        }
    }

    /// Builds the canonical message bytes.
    ///
    /// # Errors
    /// `EncodingError` if `amount >= 2^64`.
    pub fn to_message(&self) -> Result<Vec<u8>> {
        let mut message = Vec::with_capacity(MESSAGE_SIZE);
        message.extend_from_slice(DOMAIN_SPEND_AUTH);
        message.extend_from_slice(self.one_time_address.as_bytes());
        message.extend_from_slice(&codec::encode(self.amount)?);
        message.extend_from_slice(&codec::encode_u64(self.nonce));
        Ok(message)
    }

    /// Parses canonical message bytes.
    pub fn from_message(message: &[u8]) -> Result<Self> {
        if message.len() != MESSAGE_SIZE {
            return Err(ShadeError::ValidationError(format!(
                "spend authorization must be {} bytes, got {}",
                MESSAGE_SIZE,
                message.len()
            )));
        }

        let (domain, rest) = message.split_at(DOMAIN_SPEND_AUTH.len());
        if domain != DOMAIN_SPEND_AUTH {
            return Err(ShadeError::ValidationError(
                "missing spend authorization domain".into(),
            ));
        }

        let (address, rest) = rest.split_at(COMPRESSED_POINT_SIZE);
        let (amount, nonce) = rest.split_at(FIXED_WIDTH_SIZE);

        Ok(Self {
            one_time_address: CompressedPoint::from_bytes(address)?,
            amount: codec::decode_slice(amount)? as u128,
            nonce: codec::decode_slice(nonce)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn address() -> CompressedPoint {
        let mut bytes = [0x77u8; COMPRESSED_POINT_SIZE];
        bytes[0] = 0x03;
        CompressedPoint::from_array(bytes)
    }

    #[test]
    fn test_message_layout() {
        let auth = SpendAuthorization::new(address(), 0x0102, 9);
        let message = auth.to_message().unwrap();

        assert_eq!(message.len(), MESSAGE_SIZE);
        assert!(message.starts_with(DOMAIN_SPEND_AUTH));
        let tail = &message[message.len() - 2 * FIXED_WIDTH_SIZE..];
        assert_eq!(tail, &[0, 0, 0, 0, 0, 0, 1, 2, 0, 0, 0, 0, 0, 0, 0, 9]);
        assert_eq!(SpendAuthorization::from_message(&message).unwrap(), auth);
    }

    #[test_case(0, 0 ; "zero")]
    #[test_case(u64::MAX as u128, u64::MAX ; "full width")]
    #[test_case(1_000_000, 42 ; "typical")]
    fn test_amount_bounds(amount: u128, nonce: u64) {
        let auth = SpendAuthorization::new(address(), amount, nonce);
        let message = auth.to_message().unwrap();
        assert_eq!(SpendAuthorization::from_message(&message).unwrap(), auth);
    }

    #[test]
    fn test_oversized_amount_rejected() {
        let auth = SpendAuthorization::new(address(), 1u128 << 64, 0);
        assert!(matches!(
            auth.to_message(),
            Err(ShadeError::EncodingError { width: 9, max: 8 })
        ));
    }

    #[test]
    fn test_from_message_rejects_foreign_domain() {
        let mut message = SpendAuthorization::new(address(), 5, 1).to_message().unwrap();
        message[0] ^= 0xFF;
        assert!(matches!(
            SpendAuthorization::from_message(&message),
            Err(ShadeError::ValidationError(_))
        ));
        assert!(SpendAuthorization::from_message(&message[1..]).is_err());
    }
}
