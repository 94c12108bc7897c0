//! Proof-of-knowledge identity enrollment and authentication.
//!
//! This crate is the protocol engine behind an identity service: a party
//! proves knowledge of the private scalar for a registered public point on
//! secp256k1 using a non-interactive Schnorr proof bound to context data
//! (enrollment attributes, or a server-issued session challenge). The
//! surrounding application owns transport and persistence; it calls into
//! this crate with plain data and receives accept/reject decisions plus
//! opaque values to persist.
//!
//! # Components
//!
//! - [`group`]: secp256k1 scalar/point arithmetic and the hex wire encoding
//! - [`message`]: canonical proof-binding byte strings
//! - [`protocol`]: Fiat-Shamir challenge, prover, verifier
//! - [`session`]: single-use session challenges with TTL
//! - [`ledger`]: nullifier ledger for long-term replay prevention
//! - [`store`]: enrollment record store interface
//! - [`service`]: the facade the request layer invokes
//!
//! # Example
//!
//! ```rust
//! use schnorr_id::{verify_proof, KeyPair, Message, Prover, SecureRng};
//!
//! let mut rng = SecureRng::new();
//! let prover = Prover::new(KeyPair::generate(&mut rng));
//!
//! let message = Message::Verification {
//!     session_id: "d41d8cd98f00b204".to_string(),
//!     timestamp_millis: 1_700_000_000_000,
//! };
//!
//! let proof = prover.prove(&mut rng, &message.to_bytes());
//! assert!(verify_proof(prover.public(), &proof, &message.to_bytes()).is_ok());
//! ```

/// Service configuration.
pub mod config;
/// Error types.
pub mod error;
/// secp256k1 group arithmetic and wire encodings.
pub mod group;
/// Nullifier ledger for replay prevention.
pub mod ledger;
/// Canonical proof-binding messages.
pub mod message;
/// The Schnorr proof-of-knowledge protocol.
pub mod protocol;
/// Cryptographically secure randomness.
pub mod rng;
/// Service facade invoked by the request layer.
pub mod service;
/// Session challenge lifecycle.
pub mod session;
/// Enrollment record persistence interface.
pub mod store;

pub use config::ServiceConfig;
pub use error::Error;
pub use group::{Element, Scalar, Secp256k1};
pub use ledger::{LedgerEntry, MemoryNullifierLedger, NullifierLedger};
pub use message::Message;
pub use protocol::{challenge, verify_proof, KeyPair, Proof, ProofHex, Prover};
pub use rng::SecureRng;
pub use service::{AuthService, EnrollmentRequest, VerificationRequest};
pub use session::{SessionData, SessionManager};
pub use store::{EnrollmentRecord, EnrollmentStore, MemoryEnrollmentStore};

/// Convenience result type for the library.
pub type Result<T> = std::result::Result<T, Error>;
