//! End-to-end protocol scenarios across sender, receiver and auditor.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

use shade_core::config::{DomainConfig, NonceMode};
use shade_core::error::ShadeError;
use shade_core::traits::{PaymentDetector, SpendKeyDeriver};
use shade_core::types::{AuditGrant, PrivateScalar, ReceiverAddress};
use shade_crypto::{CurveDomain, KeyPair};
use shade_stealth::{
    create_stealth_payment, create_stealth_payment_with_ephemeral, scan_payments, Auditor,
    Receiver, SpendAuthorization, StealthAddressProtocol,
};

fn protocol() -> StealthAddressProtocol {
    StealthAddressProtocol::new(Arc::new(CurveDomain::secp256k1()))
}

fn pair(protocol: &StealthAddressProtocol, k: u64) -> KeyPair {
    KeyPair::from_private_scalar(protocol.domain(), PrivateScalar::from_u64(k)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// FIXED SCALARS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fixed_scalars_reproduce_across_runs() {
    // s = 3, b = 5, r = 7, each run on its own domain instance
    let run = || {
        let protocol = protocol();
        protocol
            .execute(&pair(&protocol, 3), &pair(&protocol, 5), &pair(&protocol, 7), b"audit me")
            .unwrap()
    };

    let first = run();
    let second = run();

    assert_eq!(first.shared_scalar, second.shared_scalar);
    assert_eq!(first.one_time_address, second.one_time_address);
    assert_eq!(first.one_time_private_key, second.one_time_private_key);
    assert_eq!(first.shared_point, *pair(&protocol(), 21).public_key());
}

#[test]
fn test_fixed_scalars_known_answer() {
    let protocol = protocol();
    let transcript = protocol
        .execute(&pair(&protocol, 3), &pair(&protocol, 5), &pair(&protocol, 7), b"audit me")
        .unwrap();

    // 21·G
    assert_eq!(
        transcript.shared_point.to_hex(),
        "02352bbf4a4cdd12564f93fa332ce333301d9ad40271f8107181340aef25be59d5"
    );
    // HMAC-SHA256 under a zero key over the compressed 21·G
    assert_eq!(
        transcript.shared_scalar.to_hex(),
        "10bbbde027bbba23a5018ed2e7aeb80ed73585a2cf1fc9aeae1fac0160c9d466"
    );
    assert_eq!(
        transcript.one_time_private_key.to_hex(),
        "10bbbde027bbba23a5018ed2e7aeb80ed73585a2cf1fc9aeae1fac0160c9d46b"
    );
    assert_eq!(
        transcript.one_time_address.to_hex(),
        "0384e785b94042a381fbace612e30fef73210e9d997b7495a69661be8a1670c77c"
    );
}

#[test]
fn test_fixed_scalars_agree_with_roles() {
    let protocol = protocol();
    let transcript = protocol
        .execute(&pair(&protocol, 3), &pair(&protocol, 5), &pair(&protocol, 7), b"m")
        .unwrap();

    let receiver =
        Receiver::from_key_pairs(protocol.clone(), pair(&protocol, 3), pair(&protocol, 5)).unwrap();
    let payment =
        create_stealth_payment_with_ephemeral(&protocol, receiver.address(), &pair(&protocol, 7))
            .unwrap();

    assert_eq!(payment.one_time_address, transcript.one_time_address);
    assert_eq!(
        receiver.one_time_private_key(&payment.ephemeral_pk).unwrap(),
        transcript.one_time_private_key
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// AUDITOR CONFINEMENT
// ═══════════════════════════════════════════════════════════════════════════════

fn detect_with<D: PaymentDetector + ?Sized>(detector: &D, payment: &shade_core::types::StealthPayment) -> bool {
    detector.detect(payment).unwrap()
}

#[test]
fn test_auditor_detects_but_cannot_spend() {
    let protocol = protocol();
    let receiver = Receiver::generate(protocol.clone());
    let grant = receiver.audit_grant();
    let auditor = Auditor::from_grant(protocol.clone(), &grant).unwrap();

    let payment = create_stealth_payment(&protocol, receiver.address()).unwrap();
    assert!(detect_with(&auditor, &payment));
    assert!(detect_with(&receiver, &payment));

    // What the auditor knows is exactly the grant: s and B.
    let json = serde_json::to_value(&grant).unwrap();
    let fields: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(fields, vec!["scan_sk".to_string(), "spend_pk".to_string()]);

    // c + s is not the one-time key: knowing s and c alone yields a wrong point.
    let shared = protocol
        .receiver_shared_point(&payment.ephemeral_pk, &grant.scan_sk)
        .unwrap();
    let c = protocol.shared_scalar(&shared).unwrap();
    let guess = protocol.one_time_key_pair(&c, &grant.scan_sk).unwrap();
    assert_ne!(guess.public_key(), &payment.one_time_address);
}

#[test]
fn test_auditor_scan_matches_receiver_scan() {
    let protocol = protocol();
    let receiver = Receiver::generate(protocol.clone());
    let stranger = Receiver::generate(protocol.clone());
    let auditor = Auditor::from_grant(protocol.clone(), &receiver.audit_grant()).unwrap();

    let payments: Vec<_> = (0..12)
        .map(|i| {
            let to = if i % 3 == 0 { &receiver } else { &stranger };
            create_stealth_payment(&protocol, to.address()).unwrap()
        })
        .collect();

    let expected = vec![0, 3, 6, 9];
    assert_eq!(auditor.scan(&payments), expected);
    assert_eq!(receiver.scan(&payments), expected);
    assert_eq!(scan_payments(&auditor, &payments).matches, expected);
}

#[test]
fn test_grant_roundtrips_through_json() {
    let protocol = protocol();
    let receiver = Receiver::generate(protocol.clone());
    let json = serde_json::to_string(&receiver.audit_grant()).unwrap();
    let grant: AuditGrant = serde_json::from_str(&json).unwrap();

    let auditor = Auditor::from_grant(protocol.clone(), &grant).unwrap();
    let payment = create_stealth_payment(&protocol, receiver.address()).unwrap();
    assert!(auditor.detect(&payment).unwrap());
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPENDING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_spend_authorization_flow() {
    let protocol = protocol();
    let receiver = Receiver::generate(protocol.clone());
    let payment = create_stealth_payment(&protocol, receiver.address()).unwrap();

    let auth = SpendAuthorization::new(payment.one_time_address, 1_000_000, 1);
    let message = auth.to_message().unwrap();
    let proof = receiver.prove_spend(&payment, &message).unwrap();

    assert!(protocol.verify_spend(&proof));
    assert_eq!(SpendAuthorization::from_message(&proof.message).unwrap(), auth);

    // A signature by the long-term spend key does not verify against C.
    let mut forged = proof.clone();
    forged.one_time_address = receiver.address().spend_pk;
    assert!(!protocol.verify_spend(&forged));
}

#[test]
fn test_rfc6979_mode_end_to_end() {
    let config = DomainConfig {
        nonce_mode: NonceMode::Rfc6979,
        ..Default::default()
    };
    let protocol = StealthAddressProtocol::from_config(config).unwrap();
    let receiver = Receiver::generate_with_rng(protocol.clone(), &mut ChaCha20Rng::seed_from_u64(99));
    let payment = create_stealth_payment(&protocol, receiver.address()).unwrap();

    let a = receiver.prove_spend(&payment, b"same").unwrap();
    let b = receiver.prove_spend(&payment, b"same").unwrap();
    assert_eq!(a.signature, b.signature);
    assert!(protocol.verify_spend(&a));
}

#[test]
fn test_kdf_key_length_does_not_change_addresses() {
    let short = StealthAddressProtocol::from_config(DomainConfig {
        kdf_key_len: 33,
        ..Default::default()
    })
    .unwrap();
    let long = protocol();

    let a = short.execute(&pair(&short, 3), &pair(&short, 5), &pair(&short, 7), b"m").unwrap();
    let b = long.execute(&pair(&long, 3), &pair(&long, 5), &pair(&long, 7), b"m").unwrap();
    assert_eq!(a.one_time_address, b.one_time_address);
}

#[test]
fn test_invalid_address_rejected() {
    let protocol = protocol();
    let key = *protocol.generate_key_pair().public_key();
    let address = ReceiverAddress::new(key, key);
    assert!(matches!(
        create_stealth_payment(&protocol, &address),
        Err(ShadeError::InvalidReceiverAddress(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONCURRENCY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_concurrent_senders() {
    let protocol = protocol();
    let receiver = Arc::new(Receiver::generate(protocol.clone()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let protocol = protocol.clone();
            let receiver = Arc::clone(&receiver);
            thread::spawn(move || {
                (0..8)
                    .map(|_| create_stealth_payment(&protocol, receiver.address()).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let payments: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(payments.len(), 32);
    assert_eq!(receiver.scan(&payments).len(), 32);
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_all_views_agree(s in 1u64.., b in 1u64.., r in 1u64.., message in proptest::collection::vec(any::<u8>(), 0..64)) {
        let protocol = protocol();
        let transcript = protocol
            .execute(&pair(&protocol, s), &pair(&protocol, b), &pair(&protocol, r), &message)
            .unwrap();

        prop_assert_eq!(transcript.one_time_address, transcript.receiver_one_time_address);
        prop_assert_eq!(transcript.one_time_address, transcript.audit_address);
        prop_assert!(protocol.verify_spend(&transcript.proof));
    }

    #[test]
    fn prop_seeded_receivers_detect_their_payments(seed: u64) {
        let protocol = protocol();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let receiver = Receiver::generate_with_rng(protocol.clone(), &mut rng);
        let ephemeral = KeyPair::generate_with_rng(protocol.domain(), &mut rng);

        let payment = create_stealth_payment_with_ephemeral(&protocol, receiver.address(), &ephemeral).unwrap();
        prop_assert!(receiver.detect(&payment).unwrap());
        prop_assert!(receiver.try_discover(&payment).is_some());
    }
}
