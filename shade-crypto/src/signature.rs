//! ECDSA signing and verification over secp256k1.
//!
//! Messages are hashed with SHA-256 and the digest is signed directly, so the
//! signer never sees the message itself. Signatures travel DER-encoded.
//!
//! ## Nonces
//!
//! [`NonceMode::Randomized`] draws a fresh nonce from the RNG on every call,
//! so signing the same message twice gives two different (valid) signatures.
//! [`NonceMode::Rfc6979`] derives the nonce from key and digest.
//!
//! ## Verification outcomes
//!
//! | Input                               | `try_verify`                  | `verify` |
//! |-------------------------------------|-------------------------------|----------|
//! | valid signature                     | `Ok(true)`                    | `true`   |
//! | valid signature with high `s`       | `Ok(true)`                    | `true`   |
//! | well-formed but wrong / out of range| `Ok(false)`                   | `false`  |
//! | malformed DER                       | `Err(SignatureDecodingError)` | `false`  |
//! | undecodable public key              | `Err(InvalidPointError)`      | `false`  |

use std::sync::Arc;

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier, RandomizedPrehashSigner};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument, warn};

use shade_core::config::NonceMode;
use shade_core::error::{Result, ShadeError};
use shade_core::types::{CompressedPoint, DerSignature, PrivateScalar};

use crate::der_codec::SignatureComponents;
use crate::domain::CurveDomain;
use crate::hash::sha256;

/// Signs and verifies messages for a given curve domain.
#[derive(Clone, Debug)]
pub struct SignatureProvider {
    domain: Arc<CurveDomain>,
}

impl SignatureProvider {
    /// Creates a provider bound to a domain.
    pub fn new(domain: Arc<CurveDomain>) -> Self {
        Self { domain }
    }

    /// Returns the domain this provider signs in.
    pub fn domain(&self) -> &CurveDomain {
        &self.domain
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SIGNING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Signs `SHA-256(message)` with the configured nonce strategy.
    pub fn sign(&self, message: &[u8], private_key: &PrivateScalar) -> Result<DerSignature> {
        self.sign_with_rng(message, private_key, &mut OsRng)
    }

    /// Signs `SHA-256(message)`, drawing randomized nonces from `rng`.
    ///
    /// In [`NonceMode::Rfc6979`] the RNG is not used.
    #[instrument(skip_all, fields(message_len = message.len(), mode = %self.domain.nonce_mode()))]
    pub fn sign_with_rng<R: RngCore + CryptoRng>(
        &self,
        message: &[u8],
        private_key: &PrivateScalar,
        rng: &mut R,
    ) -> Result<DerSignature> {
        let signing_key = SigningKey::from(self.domain.to_nonzero_scalar(private_key)?);
        let digest = sha256(message);

        let signed: std::result::Result<Signature, _> = match self.domain.nonce_mode() {
            NonceMode::Randomized => signing_key.sign_prehash_with_rng(rng, &digest),
            NonceMode::Rfc6979 => signing_key.sign_prehash(&digest),
        };
        let signature = signed.map_err(|e| ShadeError::SigningError(e.to_string()))?;

        let der = SignatureComponents::from_signature(&signature).to_der()?;
        debug!(signature_len = der.as_bytes().len(), "Message signed");
        Ok(der)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // VERIFICATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Verifies a DER signature, keeping malformed input distinct from a bad signature.
    pub fn try_verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &CompressedPoint,
    ) -> Result<bool> {
        let components = SignatureComponents::from_der(signature)?;
        let verifying_key = VerifyingKey::from(&self.domain.to_public_key(public_key)?);

        let Some(signature) = components.to_signature() else {
            debug!("Signature components out of range");
            return Ok(false);
        };

        // (r, s) and (r, n - s) are both valid; k256 only accepts the low form
        let signature = signature.normalize_s().unwrap_or(signature);

        let digest = sha256(message);
        Ok(verifying_key.verify_prehash(&digest, &signature).is_ok())
    }

    /// Verifies a DER signature. Every failure, malformed input included, is `false`.
    pub fn verify(&self, message: &[u8], signature: &[u8], public_key: &CompressedPoint) -> bool {
        match self.try_verify(message, signature, public_key) {
            Ok(valid) => valid,
            Err(e) => {
                warn!(error = %e, "Rejecting malformed signature input");
                false
            }
        }
    }
}
