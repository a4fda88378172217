//! The secp256k1 curve domain.
//!
//! [`CurveDomain`] is the one place that touches `k256` group arithmetic.
//! Everything above it works with the byte-level types from `shade-core`.
//! A domain is constructed once from a [`DomainConfig`] and shared by `Arc`;
//! it is immutable after construction.
//!
//! ## Boundary
//!
//! ```text
//! base_point()                 -> G
//! group_order()                -> n
//! scalar_multiply(P, k)        -> k·P
//! multiply_base(k)             -> k·G
//! point_add(P, Q)              -> P + Q
//! decode_point_compressed(b)   -> P   (InvalidPointError if not on curve)
//! add_scalars(a, b)            -> a + b mod n
//! ```

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey};
use rand::{CryptoRng, RngCore};
use tracing::debug;

use shade_core::config::{DomainConfig, NonceMode};
use shade_core::constants::{COMPRESSED_POINT_SIZE, CURVE_NAME, GROUP_ORDER, SCALAR_SIZE};
use shade_core::error::{Result, ShadeError};
use shade_core::types::{CompressedPoint, PrivateScalar};

/// Immutable secp256k1 domain parameters plus the protocol configuration.
#[derive(Clone, Debug)]
pub struct CurveDomain {
    config: DomainConfig,
    kdf_key: Vec<u8>,
}

impl CurveDomain {
    /// Creates a domain from a validated configuration.
    pub fn new(config: DomainConfig) -> Result<Self> {
        config.validate()?;
        let kdf_key = config.kdf_key();

        debug!(
            curve = CURVE_NAME,
            kdf_key_len = kdf_key.len(),
            nonce_mode = %config.nonce_mode,
            "Curve domain initialised"
        );

        Ok(Self { config, kdf_key })
    }

    /// Creates a domain with the default configuration.
    pub fn secp256k1() -> Self {
        let config = DomainConfig::default();
        let kdf_key = config.kdf_key();
        Self { config, kdf_key }
    }

    /// Returns the configuration the domain was built from.
    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    /// Returns the curve name.
    pub fn name(&self) -> &'static str {
        CURVE_NAME
    }

    /// Returns the all-zero HMAC key used by the KDF.
    pub fn kdf_key(&self) -> &[u8] {
        &self.kdf_key
    }

    /// Returns the configured ECDSA nonce strategy.
    pub fn nonce_mode(&self) -> NonceMode {
        self.config.nonce_mode
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DOMAIN PARAMETERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns the compressed base point `G`.
    pub fn base_point(&self) -> CompressedPoint {
        let encoded = AffinePoint::GENERATOR.to_encoded_point(true);
        let mut arr = [0u8; COMPRESSED_POINT_SIZE];
        arr.copy_from_slice(encoded.as_bytes());
        CompressedPoint::from_array(arr)
    }

    /// Returns the group order `n`, big-endian.
    pub fn group_order(&self) -> [u8; SCALAR_SIZE] {
        GROUP_ORDER
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SCALARS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Samples a uniform scalar in `[1, n-1]`.
    pub fn random_scalar<R: RngCore + CryptoRng>(&self, rng: &mut R) -> PrivateScalar {
        scalar_to_bytes(&NonZeroScalar::random(rng))
    }

    /// Samples a scalar and returns it with its public point.
    pub(crate) fn random_key<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> (PrivateScalar, CompressedPoint) {
        let secret = NonZeroScalar::random(rng);
        let public = PublicKey::from_secret_scalar(&secret);
        (scalar_to_bytes(&secret), encode_public_key(&public))
    }

    /// Checks that a scalar lies in `[1, n-1]`.
    pub fn validate_scalar(&self, scalar: &PrivateScalar) -> Result<()> {
        self.to_nonzero_scalar(scalar).map(|_| ())
    }

    /// Computes `a + b mod n`.
    ///
    /// # Errors
    /// `InvalidScalarError` if either input is out of range or the sum is zero.
    pub fn add_scalars(&self, a: &PrivateScalar, b: &PrivateScalar) -> Result<PrivateScalar> {
        let sum = *self.to_nonzero_scalar(a)? + *self.to_nonzero_scalar(b)?;
        let sum = Option::<NonZeroScalar>::from(NonZeroScalar::new(sum))
            .ok_or_else(|| ShadeError::InvalidScalarError("scalar sum is zero".into()))?;
        Ok(scalar_to_bytes(&sum))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // POINTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Computes `k·G`.
    pub fn multiply_base(&self, scalar: &PrivateScalar) -> Result<CompressedPoint> {
        let k = self.to_nonzero_scalar(scalar)?;
        encode_point(&(ProjectivePoint::GENERATOR * *k))
    }

    /// Computes `k·P`.
    pub fn scalar_multiply(
        &self,
        point: &CompressedPoint,
        scalar: &PrivateScalar,
    ) -> Result<CompressedPoint> {
        let p = self.to_projective(point)?;
        let k = self.to_nonzero_scalar(scalar)?;
        encode_point(&(p * *k))
    }

    /// Computes `P + Q`.
    ///
    /// # Errors
    /// `InvalidPointError` if either input is off-curve or the sum is the identity.
    pub fn point_add(&self, a: &CompressedPoint, b: &CompressedPoint) -> Result<CompressedPoint> {
        let sum = self.to_projective(a)? + self.to_projective(b)?;
        encode_point(&sum)
    }

    /// Decodes and validates a compressed point received from outside.
    pub fn decode_point_compressed(&self, bytes: &[u8]) -> Result<CompressedPoint> {
        let point = CompressedPoint::from_bytes(bytes)?;
        self.to_projective(&point)?;
        Ok(point)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // k256 CONVERSIONS
    // ═══════════════════════════════════════════════════════════════════════════

    pub(crate) fn to_nonzero_scalar(&self, scalar: &PrivateScalar) -> Result<NonZeroScalar> {
        let repr = FieldBytes::clone_from_slice(scalar.as_bytes());
        Option::from(NonZeroScalar::from_repr(repr)).ok_or_else(|| {
            ShadeError::InvalidScalarError("scalar must be in [1, n-1]".into())
        })
    }

    pub(crate) fn to_public_key(&self, point: &CompressedPoint) -> Result<PublicKey> {
        PublicKey::from_sec1_bytes(point.as_bytes())
            .map_err(|_| ShadeError::InvalidPointError("not a point on secp256k1".into()))
    }

    pub(crate) fn to_projective(&self, point: &CompressedPoint) -> Result<ProjectivePoint> {
        Ok(self.to_public_key(point)?.to_projective())
    }
}

impl Default for CurveDomain {
    fn default() -> Self {
        Self::secp256k1()
    }
}

pub(crate) fn scalar_to_bytes(scalar: &NonZeroScalar) -> PrivateScalar {
    let bytes: FieldBytes = scalar.to_bytes();
    let mut arr = [0u8; SCALAR_SIZE];
    arr.copy_from_slice(&bytes);
    PrivateScalar::from_array(arr)
}

fn encode_point(point: &ProjectivePoint) -> Result<CompressedPoint> {
    let public = PublicKey::from_affine(point.to_affine())
        .map_err(|_| ShadeError::InvalidPointError("point at infinity".into()))?;
    Ok(encode_public_key(&public))
}

pub(crate) fn encode_public_key(public: &PublicKey) -> CompressedPoint {
    let encoded = public.to_encoded_point(true);
    let mut arr = [0u8; COMPRESSED_POINT_SIZE];
    arr.copy_from_slice(encoded.as_bytes());
    CompressedPoint::from_array(arr)
}
