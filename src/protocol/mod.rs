//! The Schnorr proof-of-knowledge protocol.
//!
//! A prover demonstrates knowledge of the private scalar `x` behind a public
//! point `P = x*G`, bound to a caller-supplied message, without revealing
//! `x`. The Fiat-Shamir transform makes the proof non-interactive: the
//! challenge is derived by hashing the transcript rather than requested from
//! the verifier.

/// Fiat-Shamir challenge derivation.
pub mod challenge;
/// Key pair and proof types.
pub mod gadgets;
/// Prover implementation for generating proofs.
pub mod prover;
/// Verifier implementation for validating proofs.
pub mod verifier;

pub use challenge::challenge;
pub use gadgets::{KeyPair, Proof, ProofHex};
pub use prover::Prover;
pub use verifier::verify_proof;
