//! # SHADE Cryptography
//!
//! secp256k1 primitives for the SHADE protocol.
//!
//! This crate provides:
//!
//! - **Domain**: The explicitly constructed curve domain (group ops, SEC1 codec)
//! - **Keys**: Key pairs from fresh randomness or from a given scalar
//! - **Hash**: SHA-256, HMAC-SHA256 and the Diffie-Hellman KDF
//! - **Codec**: Fixed-width big-endian number encoding
//! - **DER**: `(r, s)` signature encoding
//! - **Signature**: ECDSA sign/verify over SHA-256 digests
//!
//! ## Security Properties
//!
//! - Scalars are validated against the group order on every use
//! - Secret scalars are zeroized on drop
//! - Malformed signatures are distinguishable from invalid ones (`try_verify`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shade_crypto::{CurveDomain, KeyPair, SignatureProvider};
//!
//! let domain = Arc::new(CurveDomain::secp256k1());
//! let keys = KeyPair::generate(&domain);
//!
//! let signer = SignatureProvider::new(domain.clone());
//! let signature = signer.sign(b"hello", keys.private_key())?;
//! assert!(signer.verify(b"hello", signature.as_bytes(), keys.public_key()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod codec;
pub mod der_codec;
pub mod domain;
pub mod hash;
pub mod keys;
pub mod signature;

// Re-export main types at crate root
pub use der_codec::SignatureComponents;
pub use domain::CurveDomain;
pub use hash::{derive_shared_secret, hmac_sha256, sha256};
pub use keys::KeyPair;
pub use signature::SignatureProvider;
