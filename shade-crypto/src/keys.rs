//! secp256k1 key pairs.
//!
//! A [`KeyPair`] is a private scalar `k` in `[1, n-1]` together with its
//! compressed public point `k·G`. The same type serves the scan, spend,
//! ephemeral and one-time roles.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use shade_core::error::Result;
use shade_core::types::{CompressedPoint, PrivateScalar};

use crate::domain::CurveDomain;

/// A private scalar and its public point.
///
/// The private half is zeroized on drop and never shown by `Debug`.
#[derive(Clone)]
pub struct KeyPair {
    private: PrivateScalar,
    public: CompressedPoint,
}

impl KeyPair {
    /// Generates a key pair from the operating system RNG.
    pub fn generate(domain: &CurveDomain) -> Self {
        Self::generate_with_rng(domain, &mut OsRng)
    }

    /// Generates a key pair from a caller-supplied CSPRNG.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(domain: &CurveDomain, rng: &mut R) -> Self {
        let (private, public) = domain.random_key(rng);
        debug!(public_key = %public, "Generated key pair");
        Self { private, public }
    }

    /// Builds a key pair from an existing private scalar.
    ///
    /// # Errors
    /// `InvalidScalarError` if the scalar is zero or not below the group order.
    pub fn from_private_scalar(domain: &CurveDomain, private: PrivateScalar) -> Result<Self> {
        let public = domain.multiply_base(&private)?;
        Ok(Self { private, public })
    }

    /// Returns the private scalar.
    ///
    /// # Security
    /// Handle the returned value carefully - do not log or expose it.
    pub fn private_key(&self) -> &PrivateScalar {
        &self.private
    }

    /// Returns the compressed public point.
    pub fn public_key(&self) -> &CompressedPoint {
        &self.public
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private", &"[REDACTED]")
            .field("public", &self.public)
            .finish()
    }
}
