//! Domain types for SHADE.
//!
//! This module provides all the core data structures used throughout the protocol:
//!
//! - [`CompressedPoint`] / [`PrivateScalar`]: secp256k1 key material
//! - [`ReceiverAddress`]: Published `(S, B)` pair for receiving payments
//! - [`AuditGrant`]: `(s, B)` pair for delegated detection
//! - [`StealthPayment`]: One-time address plus ephemeral key
//! - [`SpendProof`]: Signature proving control of a one-time address

mod keys;
mod address;
mod payment;

pub use keys::*;
pub use address::*;
pub use payment::*;
