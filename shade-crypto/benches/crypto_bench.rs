//! Criterion benchmarks for SHADE crypto: keygen, kdf, sign, verify, DER.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use shade_core::config::{DomainConfig, NonceMode};
use shade_crypto::{derive_shared_secret, CurveDomain, KeyPair, SignatureComponents, SignatureProvider};

fn bench_keygen(c: &mut Criterion) {
    let domain = CurveDomain::secp256k1();
    let mut g = c.benchmark_group("keygen");
    g.throughput(Throughput::Elements(1));
    g.bench_function("generate", |b| {
        b.iter(|| black_box(KeyPair::generate(&domain)));
    });
    g.finish();
}

fn bench_kdf(c: &mut Criterion) {
    let domain = CurveDomain::secp256k1();
    let scan = KeyPair::generate(&domain);
    let ephemeral = KeyPair::generate(&domain);
    let shared = domain
        .scalar_multiply(scan.public_key(), ephemeral.private_key())
        .unwrap();

    let mut g = c.benchmark_group("kdf");
    g.throughput(Throughput::Elements(1));
    g.bench_function("ecdh", |b| {
        b.iter(|| black_box(domain.scalar_multiply(scan.public_key(), ephemeral.private_key())).unwrap());
    });
    g.bench_function("derive_shared_secret", |b| {
        b.iter(|| black_box(derive_shared_secret(domain.kdf_key(), &shared)).unwrap());
    });
    g.finish();
}

fn bench_signatures(c: &mut Criterion) {
    let config = DomainConfig {
        nonce_mode: NonceMode::Rfc6979,
        ..Default::default()
    };
    let provider = SignatureProvider::new(Arc::new(CurveDomain::new(config).unwrap()));
    let pair = KeyPair::generate(provider.domain());
    let message = [0x5Au8; 64];
    let sig = provider.sign(&message, pair.private_key()).unwrap();

    let mut g = c.benchmark_group("ecdsa");
    g.throughput(Throughput::Elements(1));
    g.bench_function("sign", |b| {
        b.iter(|| black_box(provider.sign(&message, pair.private_key())).unwrap());
    });
    g.bench_function("verify", |b| {
        b.iter(|| black_box(provider.verify(&message, sig.as_bytes(), pair.public_key())));
    });
    g.bench_function("der_decode", |b| {
        b.iter(|| black_box(SignatureComponents::from_der(sig.as_bytes())).unwrap());
    });
    g.finish();
}

criterion_group!(benches, bench_keygen, bench_kdf, bench_signatures);
criterion_main!(benches);
