//! Auditor role.
//!
//! An auditor holds the grant `(s, B)`: the receiver's scan secret and spend
//! public key. It can recognise every payment to the receiver but has no way
//! to obtain a one-time private key, since that needs `b`.
//!
//! [`Auditor`] implements [`PaymentDetector`] and deliberately not
//! [`SpendKeyDeriver`](shade_core::traits::SpendKeyDeriver).

use tracing::debug;

use shade_core::error::Result;
use shade_core::traits::PaymentDetector;
use shade_core::types::{AuditGrant, CompressedPoint, PrivateScalar, StealthPayment};

use crate::protocol::{addresses_match, StealthAddressProtocol};

/// A third party that can detect, but not spend, a receiver's payments.
pub struct Auditor {
    protocol: StealthAddressProtocol,
    scan_sk: PrivateScalar,
    spend_pk: CompressedPoint,
}

impl Auditor {
    /// Creates an auditor from a receiver's grant.
    ///
    /// # Errors
    /// `InvalidScalarError` or `InvalidPointError` if the grant does not hold
    /// a valid scan secret and spend point.
    pub fn from_grant(protocol: StealthAddressProtocol, grant: &AuditGrant) -> Result<Self> {
        protocol.domain().validate_scalar(&grant.scan_sk)?;
        let spend_pk = protocol
            .domain()
            .decode_point_compressed(grant.spend_pk.as_bytes())?;

        debug!(spend_pk = %spend_pk, "Auditor created");

        Ok(Self {
            protocol,
            scan_sk: grant.scan_sk.clone(),
            spend_pk,
        })
    }

    /// Returns the spend public key this auditor watches.
    pub fn spend_public_key(&self) -> &CompressedPoint {
        &self.spend_pk
    }
}

impl PaymentDetector for Auditor {
    fn expected_address(&self, ephemeral_pk: &CompressedPoint) -> Result<CompressedPoint> {
        self.protocol
            .audit_address(ephemeral_pk, &self.scan_sk, &self.spend_pk)
    }

    fn detect(&self, payment: &StealthPayment) -> Result<bool> {
        let expected = self.expected_address(&payment.ephemeral_pk)?;
        Ok(addresses_match(&expected, &payment.one_time_address))
    }
}

impl std::fmt::Debug for Auditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("spend_pk", &self.spend_pk)
            .finish_non_exhaustive()
    }
}
