//! Receiver role.
//!
//! The receiver holds both key pairs:
//! - Scan keys: for recognising payments (the secret can be shared with auditors)
//! - Spend keys: for deriving one-time private keys and spending funds

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shade_core::error::{Result, ShadeError};
use shade_core::traits::{PaymentDetector, SpendKeyDeriver};
use shade_core::types::{
    scalar_hex, AuditGrant, CompressedPoint, PrivateScalar, ReceiverAddress, SpendProof,
    StealthPayment,
};
use shade_crypto::KeyPair;

use crate::protocol::{addresses_match, StealthAddressProtocol};

/// A receiver of stealth payments.
pub struct Receiver {
    protocol: StealthAddressProtocol,
    scan: KeyPair,
    spend: KeyPair,
    address: ReceiverAddress,
}

impl Receiver {
    /// Generates a receiver with fresh scan and spend keys.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let receiver = Receiver::generate(protocol.clone());
    /// println!("Address: {}", receiver.address().to_hex());
    /// ```
    pub fn generate(protocol: StealthAddressProtocol) -> Self {
        let scan = protocol.generate_key_pair();
        let spend = protocol.generate_key_pair();
        Self::assemble(protocol, scan, spend)
    }

    /// Generates a receiver from a caller-supplied CSPRNG.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        protocol: StealthAddressProtocol,
        rng: &mut R,
    ) -> Self {
        let scan = KeyPair::generate_with_rng(protocol.domain(), rng);
        let spend = KeyPair::generate_with_rng(protocol.domain(), rng);
        Self::assemble(protocol, scan, spend)
    }

    /// Creates a receiver from existing key pairs.
    pub fn from_key_pairs(
        protocol: StealthAddressProtocol,
        scan: KeyPair,
        spend: KeyPair,
    ) -> Result<Self> {
        let address = ReceiverAddress::new(*scan.public_key(), *spend.public_key());
        address.validate()?;
        Ok(Self {
            protocol,
            scan,
            spend,
            address,
        })
    }

    /// Restores a receiver from exported keys.
    pub fn from_keys(protocol: StealthAddressProtocol, keys: &ReceiverKeys) -> Result<Self> {
        let scan = KeyPair::from_private_scalar(protocol.domain(), keys.scan_sk.clone())?;
        let spend = KeyPair::from_private_scalar(protocol.domain(), keys.spend_sk.clone())?;
        let receiver = Self::from_key_pairs(protocol, scan, spend)?;

        if receiver.address != keys.address {
            return Err(ShadeError::ValidationError(
                "exported keys do not match their address".into(),
            ));
        }
        Ok(receiver)
    }

    fn assemble(protocol: StealthAddressProtocol, scan: KeyPair, spend: KeyPair) -> Self {
        let address = ReceiverAddress::new(*scan.public_key(), *spend.public_key());
        debug!(scan_pk = %address.scan_pk, spend_pk = %address.spend_pk, "Receiver keys generated");
        Self {
            protocol,
            scan,
            spend,
            address,
        }
    }

    /// Returns the address to publish.
    pub fn address(&self) -> &ReceiverAddress {
        &self.address
    }

    /// Returns what an auditor needs: `(s, B)`.
    pub fn audit_grant(&self) -> AuditGrant {
        AuditGrant::new(self.scan.private_key().clone(), *self.spend.public_key())
    }

    /// Exports both secrets for storage.
    pub fn export_keys(&self) -> ReceiverKeys {
        ReceiverKeys {
            scan_sk: self.scan.private_key().clone(),
            spend_sk: self.spend.private_key().clone(),
            address: self.address.clone(),
        }
    }

    /// Returns the one-time key pair if the payment is ours.
    ///
    /// Payments that are not ours and payments that fail to decode both give
    /// `None`; the latter are logged.
    pub fn try_discover(&self, payment: &StealthPayment) -> Option<KeyPair> {
        match self.discover(payment) {
            Ok(found) => found,
            Err(e) => {
                warn!(ephemeral_pk = %payment.ephemeral_pk, error = %e, "Skipping undecodable payment");
                None
            }
        }
    }

    fn discover(&self, payment: &StealthPayment) -> Result<Option<KeyPair>> {
        let shared = self
            .protocol
            .receiver_shared_point(&payment.ephemeral_pk, self.scan.private_key())?;
        let c = self.protocol.shared_scalar(&shared)?;
        let one_time = self.protocol.one_time_key_pair(&c, self.spend.private_key())?;

        if addresses_match(one_time.public_key(), &payment.one_time_address) {
            debug!(one_time_address = %payment.one_time_address, "Payment discovered");
            Ok(Some(one_time))
        } else {
            Ok(None)
        }
    }

    /// Signs `message` with the one-time key of a payment we own.
    ///
    /// # Errors
    /// `InvalidPayment` if the payment is not ours.
    pub fn prove_spend(&self, payment: &StealthPayment, message: &[u8]) -> Result<SpendProof> {
        let one_time = self
            .discover(payment)?
            .ok_or_else(|| ShadeError::InvalidPayment("payment is not addressed to us".into()))?;
        self.protocol.prove_spend(&one_time, message)
    }
}

impl PaymentDetector for Receiver {
    fn expected_address(&self, ephemeral_pk: &CompressedPoint) -> Result<CompressedPoint> {
        self.protocol.audit_address(
            ephemeral_pk,
            self.scan.private_key(),
            self.spend.public_key(),
        )
    }

    fn detect(&self, payment: &StealthPayment) -> Result<bool> {
        let expected = self.expected_address(&payment.ephemeral_pk)?;
        Ok(addresses_match(&expected, &payment.one_time_address))
    }
}

impl SpendKeyDeriver for Receiver {
    fn one_time_private_key(&self, ephemeral_pk: &CompressedPoint) -> Result<PrivateScalar> {
        let shared = self
            .protocol
            .receiver_shared_point(ephemeral_pk, self.scan.private_key())?;
        let c = self.protocol.shared_scalar(&shared)?;
        self.protocol.one_time_private_key(&c, self.spend.private_key())
    }
}

impl std::fmt::Debug for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY EXPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Serializable receiver secrets.
///
/// # Security
/// Contains both private keys. Store encrypted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReceiverKeys {
    /// Scan private key `s`
    #[serde(with = "scalar_hex")]
    pub scan_sk: PrivateScalar,
    /// Spend private key `b`
    #[serde(with = "scalar_hex")]
    pub spend_sk: PrivateScalar,
    /// The matching public address
    pub address: ReceiverAddress,
}

impl ReceiverKeys {
    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use shade_crypto::CurveDomain;

    use crate::sender::create_stealth_payment;

    fn protocol() -> StealthAddressProtocol {
        StealthAddressProtocol::new(Arc::new(CurveDomain::secp256k1()))
    }

    #[test]
    fn test_receiver_discovers_own_payment() {
        let protocol = protocol();
        let receiver = Receiver::generate(protocol.clone());
        let payment = create_stealth_payment(&protocol, receiver.address()).unwrap();

        assert!(receiver.detect(&payment).unwrap());
        let one_time = receiver.try_discover(&payment).unwrap();
        assert_eq!(one_time.public_key(), &payment.one_time_address);
        assert_eq!(
            &receiver.one_time_private_key(&payment.ephemeral_pk).unwrap(),
            one_time.private_key()
        );
    }

    #[test]
    fn test_receiver_ignores_foreign_payment() {
        let protocol = protocol();
        let alice = Receiver::generate(protocol.clone());
        let bob = Receiver::generate(protocol.clone());
        let payment = create_stealth_payment(&protocol, bob.address()).unwrap();

        assert!(!alice.detect(&payment).unwrap());
        assert!(alice.try_discover(&payment).is_none());
        assert!(matches!(
            alice.prove_spend(&payment, b"steal"),
            Err(ShadeError::InvalidPayment(_))
        ));
    }

    #[test]
    fn test_undecodable_payment_is_none() {
        let protocol = protocol();
        let receiver = Receiver::generate(protocol.clone());
        let mut bad = [0u8; 33];
        bad[0] = 0x02;
        bad[32] = 5;
        let payment = StealthPayment::new(receiver.address().spend_pk, CompressedPoint::from_array(bad));

        assert!(receiver.try_discover(&payment).is_none());
        assert!(receiver.detect(&payment).is_err());
    }

    #[test]
    fn test_prove_spend_verifies() {
        let protocol = protocol();
        let receiver = Receiver::generate(protocol.clone());
        let payment = create_stealth_payment(&protocol, receiver.address()).unwrap();

        let proof = receiver.prove_spend(&payment, b"withdraw").unwrap();
        assert_eq!(proof.one_time_address, payment.one_time_address);
        assert!(protocol.verify_spend(&proof));
    }

    #[test]
    fn test_keys_json_roundtrip() {
        let protocol = protocol();
        let receiver =
            Receiver::generate_with_rng(protocol.clone(), &mut ChaCha20Rng::seed_from_u64(1));

        let json = receiver.export_keys().to_json().unwrap();
        let keys = ReceiverKeys::from_json(&json).unwrap();
        let restored = Receiver::from_keys(protocol, &keys).unwrap();
        assert_eq!(restored.address(), receiver.address());
    }

    #[test]
    fn test_keys_with_foreign_address_rejected() {
        let protocol = protocol();
        let receiver = Receiver::generate(protocol.clone());
        let other = Receiver::generate(protocol.clone());

        let mut keys = receiver.export_keys();
        keys.address = other.address().clone();
        assert!(matches!(
            Receiver::from_keys(protocol, &keys),
            Err(ShadeError::ValidationError(_))
        ));
    }

    #[test]
    fn test_debug_hides_keys() {
        let receiver = Receiver::generate(protocol());
        let debug = format!("{:?}", receiver);
        assert!(debug.contains("Receiver"));
        assert!(!debug.contains(&receiver.export_keys().scan_sk.to_hex()));
    }
}
