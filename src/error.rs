//! Error types for the authentication core.

/// Main error type for the library.
///
/// Every variant is terminal for the request that produced it: nothing is
/// retried internally, and no rejection leaves partially-applied state
/// behind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A hex-encoded point or scalar failed to decode to a valid value.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// The algebraic proof check failed.
    #[error("Invalid proof")]
    InvalidProof,

    /// The session is missing, expired, or already consumed.
    #[error("Invalid or expired session")]
    SessionInvalid,

    /// The nullifier was already consumed by a prior verification.
    #[error("Replay detected: nullifier already consumed")]
    ReplayDetected,

    /// No enrollment record exists for the presented public key.
    #[error("Identity not found")]
    IdentityNotFound,

    /// An enrollment uniqueness constraint was violated.
    #[error("Duplicate identity: {0}")]
    DuplicateIdentity(String),

    /// A configured capacity limit was reached.
    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    /// The backing store reported a failure.
    #[error("Store error: {0}")]
    Store(String),
}
