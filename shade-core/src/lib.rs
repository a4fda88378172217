//! # SHADE Core
//!
//! Core types, errors, and traits for the SHADE dual-key stealth address protocol.
//!
//! This crate provides the foundational building blocks used by all other SHADE crates:
//!
//! - **Types**: Byte-level models for points, scalars, addresses, payments and proofs
//! - **Errors**: A single error enum shared by every crate
//! - **Constants**: secp256k1 sizes, codec widths and domain separators
//! - **Config**: The immutable domain configuration loaded once at start-up
//! - **Traits**: Detection and spend-key derivation capabilities
//!
//! ## Example
//!
//! ```rust
//! use shade_core::{CompressedPoint, ReceiverAddress};
//!
//! let scan = CompressedPoint::from_array([0x02; 33]);
//! let spend = CompressedPoint::from_array([0x03; 33]);
//! let address = ReceiverAddress::new(scan, spend);
//! let json = serde_json::to_string(&address).unwrap();
//! assert!(json.contains("scan_pk"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{DomainConfig, NonceMode};
pub use constants::*;
pub use error::{Result, ShadeError};
pub use traits::*;
pub use types::*;
