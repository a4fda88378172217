//! DER encoding of ECDSA signatures.
//!
//! ```text
//! ECDSA-Sig-Value ::= SEQUENCE {
//!     r INTEGER,
//!     s INTEGER
//! }
//! ```
//!
//! Both integers are positive and minimally encoded; a leading `0x00` is
//! emitted when the high bit of the magnitude is set. Anything else (wrong
//! tag, one or three elements, negative or zero integers, trailing bytes) is
//! a `SignatureDecodingError`.

use ::der::asn1::UintRef;
use ::der::{Decode, Encode, Sequence};
use k256::ecdsa::Signature;
use k256::FieldBytes;

use shade_core::constants::SCALAR_SIZE;
use shade_core::error::{Result, ShadeError};
use shade_core::types::DerSignature;

#[derive(Sequence)]
struct EcdsaSigValue<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

/// The decoded `(r, s)` pair, held as minimal big-endian magnitudes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureComponents {
    r: Vec<u8>,
    s: Vec<u8>,
}

impl SignatureComponents {
    /// Creates components from big-endian magnitudes.
    ///
    /// # Errors
    /// `SignatureDecodingError` if either value is zero.
    pub fn new(r: &[u8], s: &[u8]) -> Result<Self> {
        Ok(Self {
            r: positive_magnitude(r, "r")?,
            s: positive_magnitude(s, "s")?,
        })
    }

    /// Returns `r` without leading zeros.
    pub fn r(&self) -> &[u8] {
        &self.r
    }

    /// Returns `s` without leading zeros.
    pub fn s(&self) -> &[u8] {
        &self.s
    }

    /// Encodes as a DER `SEQUENCE { INTEGER r, INTEGER s }`.
    pub fn to_der(&self) -> Result<DerSignature> {
        let value = EcdsaSigValue {
            r: UintRef::new(&self.r).map_err(encoding_error)?,
            s: UintRef::new(&self.s).map_err(encoding_error)?,
        };
        let bytes = value.to_der().map_err(encoding_error)?;
        DerSignature::from_bytes(&bytes)
    }

    /// Decodes a DER signature.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let value = EcdsaSigValue::from_der(bytes)
            .map_err(|e| ShadeError::SignatureDecodingError(e.to_string()))?;
        Self::new(value.r.as_bytes(), value.s.as_bytes())
    }

    /// Takes the components of a `k256` signature.
    pub fn from_signature(signature: &Signature) -> Self {
        let (r, s) = signature.split_bytes();
        // r and s of a k256 signature are already in [1, n-1]
        Self {
            r: strip_leading_zeros(&r).to_vec(),
            s: strip_leading_zeros(&s).to_vec(),
        }
    }

    /// Converts to a `k256` signature.
    ///
    /// Returns `None` if either component is not in `[1, n-1]`, which makes
    /// the signature invalid rather than malformed.
    pub fn to_signature(&self) -> Option<Signature> {
        let r = to_field_bytes(&self.r)?;
        let s = to_field_bytes(&self.s)?;
        Signature::from_scalars(r, s).ok()
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn positive_magnitude(bytes: &[u8], name: &str) -> Result<Vec<u8>> {
    let magnitude = strip_leading_zeros(bytes);
    if magnitude.is_empty() {
        return Err(ShadeError::SignatureDecodingError(format!(
            "{name} must be positive"
        )));
    }
    Ok(magnitude.to_vec())
}

fn to_field_bytes(magnitude: &[u8]) -> Option<FieldBytes> {
    if magnitude.len() > SCALAR_SIZE {
        return None;
    }
    let mut bytes = FieldBytes::default();
    bytes[SCALAR_SIZE - magnitude.len()..].copy_from_slice(magnitude);
    Some(bytes)
}

fn encoding_error(e: ::der::Error) -> ShadeError {
    ShadeError::InternalError(format!("DER encoding failed: {e}"))
}
