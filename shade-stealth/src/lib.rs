//! # SHADE Stealth Address Protocol
//!
//! Dual-key stealth addresses over secp256k1 with delegated auditing.
//!
//! This crate provides:
//!
//! - **Protocol**: The named protocol steps and a full checked run
//! - **Receiver**: Scan and spend keys, payment discovery, spend proofs
//! - **Sender**: One-time address creation from a published address
//! - **Auditor**: Payment detection from a grant `(s, B)`, without spend rights
//! - **Scan**: Batch scanning with statistics
//! - **Authorization**: Canonical spend authorization messages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shade_crypto::CurveDomain;
//! use shade_stealth::{create_stealth_payment, Auditor, Receiver, StealthAddressProtocol};
//!
//! let protocol = StealthAddressProtocol::new(Arc::new(CurveDomain::secp256k1()));
//!
//! // Receiver: generate keys and publish the address
//! let receiver = Receiver::generate(protocol.clone());
//!
//! // Sender: pay to a fresh one-time address
//! let payment = create_stealth_payment(&protocol, receiver.address())?;
//!
//! // Receiver: recognise the payment and recover its key
//! let one_time = receiver.try_discover(&payment).expect("ours");
//!
//! // Auditor: recognise it too, without being able to spend
//! let auditor = Auditor::from_grant(protocol.clone(), &receiver.audit_grant())?;
//! assert!(auditor.detect(&payment)?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod auditor;
pub mod authorization;
pub mod protocol;
pub mod receiver;
pub mod scan;
pub mod sender;

pub use auditor::Auditor;
pub use authorization::SpendAuthorization;
pub use protocol::{ProtocolTranscript, StealthAddressProtocol};
pub use receiver::{Receiver, ReceiverKeys};
pub use scan::{scan_payment, scan_payments, ScanReport, ScanResult, ScanStats};
pub use sender::{create_stealth_payment, create_stealth_payment_with_ephemeral};

pub use shade_core::traits::{PaymentDetector, SpendKeyDeriver};
