//! The stealth address protocol as a sequence of named steps.
//!
//! ```text
//! Receiver:  scan (s, S = s·G)      spend (b, B = b·G)      publishes (S, B)
//! Sender:    ephemeral (r, R = r·G)
//!
//!  4. sender_shared_point        S·r
//!  5. receiver_shared_point      R·s                       (== S·r)
//!  6. shared_scalar              c = HMAC-SHA256(0…0, compressed(S·r))
//!  7. one_time_address           C = c·G + B
//!  8. receiver_one_time_address  (c + b)·G                 (== C)
//!  9. audit_address              KDF(R·s)·G + B            (== C, needs only s and B)
//! 10. prove_spend / verify_spend ECDSA by c + b, checked against C
//! ```
//!
//! [`StealthAddressProtocol`] holds no per-run state. It can be cloned
//! cheaply and shared between threads.

use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{debug, instrument};

use shade_core::config::DomainConfig;
use shade_core::error::{Result, ShadeError};
use shade_core::types::{CompressedPoint, PrivateScalar, SpendProof};
use shade_crypto::{derive_shared_secret, CurveDomain, KeyPair, SignatureProvider};

/// Stateless protocol engine bound to one curve domain.
#[derive(Clone, Debug)]
pub struct StealthAddressProtocol {
    domain: Arc<CurveDomain>,
    signer: SignatureProvider,
}

impl StealthAddressProtocol {
    /// Creates a protocol engine over a shared domain.
    pub fn new(domain: Arc<CurveDomain>) -> Self {
        let signer = SignatureProvider::new(domain.clone());
        Self { domain, signer }
    }

    /// Builds the domain from a configuration and wraps it.
    pub fn from_config(config: DomainConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(CurveDomain::new(config)?)))
    }

    /// Returns the curve domain.
    pub fn domain(&self) -> &CurveDomain {
        &self.domain
    }

    /// Returns the signature provider.
    pub fn signer(&self) -> &SignatureProvider {
        &self.signer
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // KEY AGREEMENT (steps 3-6)
    // ═══════════════════════════════════════════════════════════════════════════

    /// Generates a fresh key pair (scan, spend or ephemeral).
    pub fn generate_key_pair(&self) -> KeyPair {
        KeyPair::generate(&self.domain)
    }

    /// Sender side of the Diffie-Hellman exchange: `S · r`.
    pub fn sender_shared_point(
        &self,
        scan_pk: &CompressedPoint,
        ephemeral_sk: &PrivateScalar,
    ) -> Result<CompressedPoint> {
        self.domain.scalar_multiply(scan_pk, ephemeral_sk)
    }

    /// Receiver side of the Diffie-Hellman exchange: `R · s`.
    pub fn receiver_shared_point(
        &self,
        ephemeral_pk: &CompressedPoint,
        scan_sk: &PrivateScalar,
    ) -> Result<CompressedPoint> {
        self.domain.scalar_multiply(ephemeral_pk, scan_sk)
    }

    /// Derives the shared offset `c` from a Diffie-Hellman point.
    ///
    /// # Errors
    /// `InvalidScalarError` if the digest, read big-endian, is zero or not
    /// below the group order. The value is neither reduced nor re-derived.
    pub fn shared_scalar(&self, shared_point: &CompressedPoint) -> Result<PrivateScalar> {
        let secret = derive_shared_secret(self.domain.kdf_key(), shared_point)?;
        let c = PrivateScalar::from_array(*secret.as_array());

        self.domain.validate_scalar(&c).map_err(|_| {
            ShadeError::InvalidScalarError("KDF output outside [1, n-1]".into())
        })?;
        Ok(c)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ONE-TIME ADDRESS (steps 7-9)
    // ═══════════════════════════════════════════════════════════════════════════

    /// Sender's view of the one-time address: `c·G + B`.
    pub fn one_time_address(
        &self,
        shared_scalar: &PrivateScalar,
        spend_pk: &CompressedPoint,
    ) -> Result<CompressedPoint> {
        let offset = self.domain.multiply_base(shared_scalar)?;
        self.domain.point_add(&offset, spend_pk)
    }

    /// Receiver's view of the one-time address: `(c + b)·G`.
    pub fn receiver_one_time_address(
        &self,
        shared_scalar: &PrivateScalar,
        spend_sk: &PrivateScalar,
    ) -> Result<CompressedPoint> {
        let key = self.one_time_private_key(shared_scalar, spend_sk)?;
        self.domain.multiply_base(&key)
    }

    /// One-time private key `c + b mod n`.
    pub fn one_time_private_key(
        &self,
        shared_scalar: &PrivateScalar,
        spend_sk: &PrivateScalar,
    ) -> Result<PrivateScalar> {
        self.domain.add_scalars(shared_scalar, spend_sk)
    }

    /// One-time key pair `(c + b, (c + b)·G)`.
    pub fn one_time_key_pair(
        &self,
        shared_scalar: &PrivateScalar,
        spend_sk: &PrivateScalar,
    ) -> Result<KeyPair> {
        let key = self.one_time_private_key(shared_scalar, spend_sk)?;
        KeyPair::from_private_scalar(&self.domain, key)
    }

    /// Recomputes the one-time address from `(R, s, B)` alone.
    pub fn audit_address(
        &self,
        ephemeral_pk: &CompressedPoint,
        scan_sk: &PrivateScalar,
        spend_pk: &CompressedPoint,
    ) -> Result<CompressedPoint> {
        let shared = self.receiver_shared_point(ephemeral_pk, scan_sk)?;
        let c = self.shared_scalar(&shared)?;
        self.one_time_address(&c, spend_pk)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPEND PROOF (step 10)
    // ═══════════════════════════════════════════════════════════════════════════

    /// Signs application data with the one-time key.
    pub fn prove_spend(&self, one_time: &KeyPair, message: &[u8]) -> Result<SpendProof> {
        let signature = self.signer.sign(message, one_time.private_key())?;
        Ok(SpendProof {
            one_time_address: *one_time.public_key(),
            message: message.to_vec(),
            signature,
        })
    }

    /// Checks a spend proof against its one-time address.
    pub fn verify_spend(&self, proof: &SpendProof) -> bool {
        self.signer.verify(
            &proof.message,
            proof.signature.as_bytes(),
            &proof.one_time_address,
        )
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FULL RUN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Runs steps 4-10 for the given key pairs and cross-checks every party's view.
    ///
    /// # Errors
    /// Step errors propagate unchanged. A disagreement between two parties'
    /// views is an `InternalError`.
    #[instrument(skip_all, fields(scan_pk = %scan.public_key(), spend_pk = %spend.public_key()))]
    pub fn execute(
        &self,
        scan: &KeyPair,
        spend: &KeyPair,
        ephemeral: &KeyPair,
        message: &[u8],
    ) -> Result<ProtocolTranscript> {
        let sender_point = self.sender_shared_point(scan.public_key(), ephemeral.private_key())?;
        let receiver_point =
            self.receiver_shared_point(ephemeral.public_key(), scan.private_key())?;
        ensure_equal(&sender_point, &receiver_point, "shared points")?;
        debug!(ephemeral_pk = %ephemeral.public_key(), "Shared point agreed");

        let c = self.shared_scalar(&sender_point)?;

        let one_time_address = self.one_time_address(&c, spend.public_key())?;
        let receiver_address = self.receiver_one_time_address(&c, spend.private_key())?;
        ensure_equal(&one_time_address, &receiver_address, "one-time addresses")?;
        debug!(one_time_address = %one_time_address, "One-time address derived");

        let one_time = self.one_time_key_pair(&c, spend.private_key())?;
        ensure_equal(&one_time_address, one_time.public_key(), "one-time key pair")?;

        let audit_address =
            self.audit_address(ephemeral.public_key(), scan.private_key(), spend.public_key())?;
        ensure_equal(&one_time_address, &audit_address, "audit address")?;

        let proof = self.prove_spend(&one_time, message)?;
        if !self.verify_spend(&proof) {
            return Err(ShadeError::InternalError(
                "spend proof did not verify".into(),
            ));
        }
        debug!(signature_len = proof.signature.as_bytes().len(), "Spend proof verified");

        Ok(ProtocolTranscript {
            shared_point: sender_point,
            shared_scalar: c,
            one_time_address,
            receiver_one_time_address: receiver_address,
            one_time_private_key: one_time.private_key().clone(),
            audit_address,
            proof,
        })
    }
}

/// Everything one protocol run produced.
///
/// Holds secrets; `Debug` redacts them.
#[derive(Clone, Debug)]
pub struct ProtocolTranscript {
    /// `S·r == R·s`
    pub shared_point: CompressedPoint,
    /// `c`
    pub shared_scalar: PrivateScalar,
    /// `C = c·G + B`, as the sender computes it
    pub one_time_address: CompressedPoint,
    /// `(c + b)·G`, as the receiver computes it
    pub receiver_one_time_address: CompressedPoint,
    /// `c + b`
    pub one_time_private_key: PrivateScalar,
    /// `KDF(R·s)·G + B`, as the auditor computes it
    pub audit_address: CompressedPoint,
    /// Verified signature by `c + b`
    pub proof: SpendProof,
}

/// Compares two addresses in constant time.
pub(crate) fn addresses_match(a: &CompressedPoint, b: &CompressedPoint) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn ensure_equal(a: &CompressedPoint, b: &CompressedPoint, what: &str) -> Result<()> {
    if addresses_match(a, b) {
        Ok(())
    } else {
        Err(ShadeError::InternalError(format!("{what} disagree")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_core::constants::SCALAR_SIZE;

    fn protocol() -> StealthAddressProtocol {
        StealthAddressProtocol::new(Arc::new(CurveDomain::secp256k1()))
    }

    fn pair(protocol: &StealthAddressProtocol, k: u64) -> KeyPair {
        KeyPair::from_private_scalar(protocol.domain(), PrivateScalar::from_u64(k)).unwrap()
    }

    #[test]
    fn test_shared_scalar_reads_digest_unsigned() {
        let protocol = protocol();
        // HMAC over 2·G has its top bit set
        let c = protocol.shared_scalar(pair(&protocol, 2).public_key()).unwrap();
        assert!(c.as_bytes()[0] & 0x80 != 0);
        assert_eq!(
            c.to_hex(),
            "e981baa448cd05e67bb2eecb2460ad18a2570651274e0952c8f33565b2731469"
        );
    }

    #[test]
    fn test_execute_random_keys() {
        let protocol = protocol();
        let scan = protocol.generate_key_pair();
        let spend = protocol.generate_key_pair();
        let ephemeral = protocol.generate_key_pair();

        let transcript = protocol.execute(&scan, &spend, &ephemeral, b"hello").unwrap();
        assert_eq!(transcript.one_time_address, transcript.receiver_one_time_address);
        assert_eq!(transcript.one_time_address, transcript.audit_address);
        assert_eq!(transcript.proof.one_time_address, transcript.one_time_address);
        assert!(protocol.verify_spend(&transcript.proof));
    }

    #[test]
    fn test_shared_points_agree() {
        let protocol = protocol();
        let scan = pair(&protocol, 3);
        let ephemeral = pair(&protocol, 7);

        let sender = protocol
            .sender_shared_point(scan.public_key(), ephemeral.private_key())
            .unwrap();
        let receiver = protocol
            .receiver_shared_point(ephemeral.public_key(), scan.private_key())
            .unwrap();
        assert_eq!(sender, receiver);
        // 3·7 = 21
        assert_eq!(&sender, pair(&protocol, 21).public_key());
    }

    #[test]
    fn test_one_time_private_key_matches_address() {
        let protocol = protocol();
        let c = PrivateScalar::from_u64(11);
        let spend = pair(&protocol, 5);

        let address = protocol.one_time_address(&c, spend.public_key()).unwrap();
        let key = protocol.one_time_private_key(&c, spend.private_key()).unwrap();
        assert_eq!(key, PrivateScalar::from_u64(16));
        assert_eq!(protocol.domain().multiply_base(&key).unwrap(), address);
    }

    #[test]
    fn test_offset_cancelling_spend_key_is_rejected() {
        let protocol = protocol();
        // c = n - 5 and b = 5 gives c + b = 0 and c·G + B = identity
        let mut c = protocol.domain().group_order();
        c[SCALAR_SIZE - 1] -= 5;
        let c = PrivateScalar::from_array(c);
        let spend = pair(&protocol, 5);

        assert!(matches!(
            protocol.one_time_address(&c, spend.public_key()),
            Err(ShadeError::InvalidPointError(_))
        ));
        assert!(matches!(
            protocol.one_time_private_key(&c, spend.private_key()),
            Err(ShadeError::InvalidScalarError(_))
        ));
    }

    #[test]
    fn test_tampered_proof_rejected() {
        let protocol = protocol();
        let transcript = protocol
            .execute(
                &protocol.generate_key_pair(),
                &protocol.generate_key_pair(),
                &protocol.generate_key_pair(),
                b"amount=10",
            )
            .unwrap();

        let mut proof = transcript.proof.clone();
        proof.message = b"amount=11".to_vec();
        assert!(!protocol.verify_spend(&proof));

        let mut proof = transcript.proof;
        proof.one_time_address = transcript.shared_point;
        assert!(!protocol.verify_spend(&proof));
    }

    #[test]
    fn test_transcript_debug_redacts_secrets() {
        let protocol = protocol();
        let transcript = protocol
            .execute(&pair(&protocol, 3), &pair(&protocol, 5), &pair(&protocol, 7), b"m")
            .unwrap();
        let debug = format!("{:?}", transcript);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&transcript.one_time_private_key.to_hex()));
    }
}
