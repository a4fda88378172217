//! Error types for SHADE.
//!
//! This module provides the error hierarchy shared by every SHADE crate using
//! `thiserror`. None of these errors is transient: cryptographic failures are
//! surfaced to the immediate caller and never retried.

use thiserror::Error;

/// Result type alias using `ShadeError`.
pub type Result<T> = std::result::Result<T, ShadeError>;

/// Main error type for all SHADE operations.
#[derive(Debug, Error)]
pub enum ShadeError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CRYPTOGRAPHIC ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Value too wide for the fixed-width number encoding.
    #[error("Encoding error: value needs {width} bytes, fixed width is {max}")]
    EncodingError { width: usize, max: usize },

    /// Scalar is zero or not below the group order.
    #[error("Invalid scalar: {0}")]
    InvalidScalarError(String),

    /// Bytes do not encode a point on the curve.
    #[error("Invalid point: {0}")]
    InvalidPointError(String),

    /// DER signature is structurally malformed.
    #[error("Signature decoding failed: {0}")]
    SignatureDecodingError(String),

    /// The ECDSA signer rejected its input.
    #[error("Signing failed: {0}")]
    SigningError(String),

    /// Invalid key size or format.
    #[error("Invalid key: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    // ═══════════════════════════════════════════════════════════════════════════
    // STEALTH ADDRESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid receiver address format or content.
    #[error("Invalid receiver address: {0}")]
    InvalidReceiverAddress(String),

    /// Invalid stealth payment.
    #[error("Invalid payment: {0}")]
    InvalidPayment(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Protocol version mismatch.
    #[error("Protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ShadeError {
    /// Returns true if this is a cryptographic error.
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            ShadeError::EncodingError { .. }
                | ShadeError::InvalidScalarError(_)
                | ShadeError::InvalidPointError(_)
                | ShadeError::SignatureDecodingError(_)
                | ShadeError::SigningError(_)
                | ShadeError::InvalidKeySize { .. }
        )
    }

    /// Returns true if the error came from decoding untrusted bytes.
    pub fn is_decoding_error(&self) -> bool {
        matches!(
            self,
            ShadeError::InvalidPointError(_)
                | ShadeError::SignatureDecodingError(_)
                | ShadeError::HexError(_)
                | ShadeError::JsonError(_)
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ShadeError::ValidationError(_)
                | ShadeError::InvalidReceiverAddress(_)
                | ShadeError::InvalidPayment(_)
                | ShadeError::VersionMismatch { .. }
                | ShadeError::ConfigError(_)
        )
    }
}
