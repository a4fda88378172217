//! Common traits for SHADE.
//!
//! The split between [`PaymentDetector`] and [`SpendKeyDeriver`] mirrors the
//! split between what an auditor may do and what only the receiver may do.

use tracing::debug;

use crate::error::Result;
use crate::types::{CompressedPoint, PrivateScalar, StealthPayment};

// ═══════════════════════════════════════════════════════════════════════════════
// DETECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for parties holding the scan secret `s` and spend public key `B`.
///
/// Implemented by both the receiver and a delegated auditor.
pub trait PaymentDetector: Send + Sync {
    /// Recomputes `KDF(R · s)·G + B` for an observed ephemeral key `R`.
    fn expected_address(&self, ephemeral_pk: &CompressedPoint) -> Result<CompressedPoint>;

    /// Returns true if the payment's one-time address is ours.
    fn detect(&self, payment: &StealthPayment) -> Result<bool> {
        let expected = self.expected_address(&payment.ephemeral_pk)?;
        Ok(expected == payment.one_time_address)
    }

    /// Returns the indices of the payments that are ours.
    ///
    /// Payments whose ephemeral key does not decode are skipped and logged.
    fn scan(&self, payments: &[StealthPayment]) -> Vec<usize> {
        payments
            .iter()
            .enumerate()
            .filter(|(idx, payment)| match self.detect(payment) {
                Ok(ours) => ours,
                Err(e) => {
                    debug!(index = *idx, ephemeral_pk = %payment.ephemeral_pk, error = %e, "Skipping undecodable payment");
                    false
                }
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPEND KEY DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the party holding the spend secret `b`.
///
/// Only the receiver implements this; an auditor cannot.
pub trait SpendKeyDeriver: PaymentDetector {
    /// Derives the one-time private key `c + b` for an ephemeral key `R`.
    fn one_time_private_key(&self, ephemeral_pk: &CompressedPoint) -> Result<PrivateScalar>;
}
