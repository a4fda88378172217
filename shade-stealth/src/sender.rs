//! Stealth payment creation (sender side).

use tracing::debug;

use shade_core::error::Result;
use shade_core::types::{ReceiverAddress, StealthPayment};
use shade_crypto::KeyPair;

use crate::protocol::StealthAddressProtocol;

/// Creates a stealth payment to `address` with a fresh ephemeral key.
///
/// The ephemeral secret is dropped (and zeroized) when this returns.
pub fn create_stealth_payment(
    protocol: &StealthAddressProtocol,
    address: &ReceiverAddress,
) -> Result<StealthPayment> {
    let ephemeral = protocol.generate_key_pair();
    create_stealth_payment_with_ephemeral(protocol, address, &ephemeral)
}

/// Creates a stealth payment with a caller-chosen ephemeral key pair.
///
/// Reusing an ephemeral key for two payments to the same receiver yields the
/// same one-time address; callers should not.
pub fn create_stealth_payment_with_ephemeral(
    protocol: &StealthAddressProtocol,
    address: &ReceiverAddress,
    ephemeral: &KeyPair,
) -> Result<StealthPayment> {
    address.validate()?;
    let scan_pk = protocol
        .domain()
        .decode_point_compressed(address.scan_pk.as_bytes())?;
    let spend_pk = protocol
        .domain()
        .decode_point_compressed(address.spend_pk.as_bytes())?;

    let shared = protocol.sender_shared_point(&scan_pk, ephemeral.private_key())?;
    let c = protocol.shared_scalar(&shared)?;
    let one_time_address = protocol.one_time_address(&c, &spend_pk)?;

    debug!(
        one_time_address = %one_time_address,
        ephemeral_pk = %ephemeral.public_key(),
        "Created stealth payment"
    );

    Ok(StealthPayment::new(one_time_address, *ephemeral.public_key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use shade_core::error::ShadeError;
    use shade_core::types::{CompressedPoint, PrivateScalar};
    use shade_crypto::CurveDomain;

    fn protocol() -> StealthAddressProtocol {
        StealthAddressProtocol::new(Arc::new(CurveDomain::secp256k1()))
    }

    fn address(protocol: &StealthAddressProtocol) -> ReceiverAddress {
        ReceiverAddress::new(
            *protocol.generate_key_pair().public_key(),
            *protocol.generate_key_pair().public_key(),
        )
    }

    #[test]
    fn test_payments_are_unlinkable() {
        let protocol = protocol();
        let address = address(&protocol);

        let a = create_stealth_payment(&protocol, &address).unwrap();
        let b = create_stealth_payment(&protocol, &address).unwrap();
        assert_ne!(a.one_time_address, b.one_time_address);
        assert_ne!(a.ephemeral_pk, b.ephemeral_pk);
        assert_ne!(a.one_time_address, address.spend_pk);
    }

    #[test]
    fn test_fixed_ephemeral_is_deterministic() {
        let protocol = protocol();
        let address = address(&protocol);
        let ephemeral =
            KeyPair::from_private_scalar(protocol.domain(), PrivateScalar::from_u64(7)).unwrap();

        let a = create_stealth_payment_with_ephemeral(&protocol, &address, &ephemeral).unwrap();
        let b = create_stealth_payment_with_ephemeral(&protocol, &address, &ephemeral).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a.ephemeral_pk, ephemeral.public_key());
    }

    #[test]
    fn test_off_curve_address_rejected() {
        let protocol = protocol();
        let mut bad = [0u8; 33];
        bad[0] = 0x02;
        bad[32] = 5;
        let address = ReceiverAddress::new(
            CompressedPoint::from_array(bad),
            *protocol.generate_key_pair().public_key(),
        );

        assert!(matches!(
            create_stealth_payment(&protocol, &address),
            Err(ShadeError::InvalidPointError(_))
        ));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let protocol = protocol();
        let mut address = address(&protocol);
        address.version += 1;
        assert!(matches!(
            create_stealth_payment(&protocol, &address),
            Err(ShadeError::VersionMismatch { .. })
        ));
    }
}
