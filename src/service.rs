//! Service facade: the operations the surrounding request layer calls.
//!
//! The external layer hands plain request data to this module and receives
//! accept/reject decisions. Verification runs in a fixed order: validate
//! encodings, check session validity, verify the proof algebraically, then
//! consume the nullifier and session. Only a fully successful proof reaches
//! a durable mutation.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::group::Secp256k1;
use crate::ledger::{LedgerEntry, NullifierLedger};
use crate::message::Message;
use crate::protocol::{verify_proof, Proof, ProofHex};
use crate::session::{now_millis, SessionManager};
use crate::store::{EnrollmentRecord, EnrollmentStore};
use crate::{Error, Result};

/// Maximum accepted length for opaque client-supplied tokens.
const MAX_TOKEN_LEN: usize = 256;

/// Hex length of the hashed identity attributes (SHA-256 digests).
const DIGEST_HEX_LEN: usize = 64;

/// Enrollment call payload, under the field names clients send.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    /// Public point the identity will authenticate with, hex.
    pub public_key: String,
    /// Hex identity commitment.
    pub commitment: String,
    /// Hex digest of the identity document number.
    pub id_number_hash: String,
    /// Hex digest of the full name.
    pub full_name_hash: String,
    /// Hex digest of the date of birth.
    pub dob_hash: String,
    /// Approval flag from the enrollment screening step.
    pub approval: u32,
    /// Opaque ciphertext blob persisted verbatim.
    #[serde(rename = "encryptedPII")]
    pub encrypted_pii: String,
    /// Proof of knowledge bound to the enrollment message.
    pub proof: ProofHex,
    /// Client-side Unix timestamp in milliseconds.
    pub timestamp: u64,
}

/// Verification call payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Session identifier obtained from challenge issuance.
    pub session_id: String,
    /// Public point of the claimed identity, hex.
    pub public_key: String,
    /// Proof of knowledge bound to the verification message.
    pub proof: ProofHex,
    /// One-time replay-prevention token.
    pub nullifier: String,
    /// Client-side Unix timestamp in milliseconds.
    pub timestamp: u64,
}

/// Protocol engine facade over injected stores.
pub struct AuthService<S, L> {
    store: Arc<S>,
    ledger: Arc<L>,
    sessions: SessionManager,
}

impl<S, L> Clone for AuthService<S, L> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: Arc::clone(&self.ledger),
            sessions: self.sessions.clone(),
        }
    }
}

impl<S: EnrollmentStore, L: NullifierLedger> AuthService<S, L> {
    /// Creates a service over the given stores.
    pub fn new(store: Arc<S>, ledger: Arc<L>, config: &ServiceConfig) -> Self {
        Self {
            store,
            ledger,
            sessions: SessionManager::new(config),
        }
    }

    /// The session manager backing [`issue_challenge`](Self::issue_challenge),
    /// exposed so a host can schedule periodic `purge_expired` sweeps.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    fn validate_digest(field: &str, value: &str) -> Result<()> {
        if value.len() != DIGEST_HEX_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidEncoding(format!(
                "{field} must be a {DIGEST_HEX_LEN}-character hex digest"
            )));
        }
        Ok(())
    }

    fn validate_token(field: &str, value: &str) -> Result<()> {
        if value.is_empty() || value.len() > MAX_TOKEN_LEN {
            return Err(Error::InvalidEncoding(format!(
                "{field} must be 1..={MAX_TOKEN_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Enrolls a new identity.
    ///
    /// Accepts iff the submitted proof verifies against the enrollment
    /// message reconstructed from the request fields and neither unique key
    /// is already taken.
    pub async fn enroll(&self, request: EnrollmentRequest) -> Result<()> {
        let start = Instant::now();
        counter!("auth.enroll.requests").increment(1);

        let outcome = self.enroll_inner(request).await;

        if outcome.is_err() {
            counter!("auth.enroll.rejected").increment(1);
        }
        histogram!("auth.enroll.duration_seconds").record(start.elapsed().as_secs_f64());

        outcome
    }

    async fn enroll_inner(&self, request: EnrollmentRequest) -> Result<()> {
        let public = Secp256k1::element_from_hex(&request.public_key)?;
        let proof = Proof::from_hex(&request.proof)?;
        Self::validate_digest("idNumberHash", &request.id_number_hash)?;
        Self::validate_digest("fullNameHash", &request.full_name_hash)?;
        Self::validate_digest("dobHash", &request.dob_hash)?;
        Self::validate_token("commitment", &request.commitment)?;

        if self
            .store
            .find_by_id_hash(&request.id_number_hash)
            .await?
            .is_some()
        {
            debug!("enrollment rejected: id already enrolled");
            return Err(Error::DuplicateIdentity("id already enrolled".to_string()));
        }
        if self
            .store
            .find_by_public_key(&request.public_key)
            .await?
            .is_some()
        {
            debug!("enrollment rejected: public key already enrolled");
            return Err(Error::DuplicateIdentity(
                "public key already enrolled".to_string(),
            ));
        }

        let message = Message::Enrollment {
            commitment_hex: request.commitment.clone(),
            id_hash: request.id_number_hash.clone(),
            name_hash: request.full_name_hash.clone(),
            dob_hash: request.dob_hash.clone(),
            approval: request.approval,
            timestamp_millis: request.timestamp,
        };

        if let Err(e) = verify_proof(&public, &proof, &message.to_bytes()) {
            debug!("enrollment rejected: {e}");
            return Err(e);
        }

        // The store re-checks both unique keys under its own lock, which
        // closes the race between the pre-checks above and this insert.
        self.store
            .insert(EnrollmentRecord {
                public_key_hex: request.public_key,
                commitment_hex: request.commitment,
                id_hash: request.id_number_hash,
                name_hash: request.full_name_hash,
                dob_hash: request.dob_hash,
                approval: request.approval,
                encrypted_pii: request.encrypted_pii,
                proof: request.proof,
                created_at_millis: now_millis(),
            })
            .await?;

        info!("identity enrolled");
        Ok(())
    }

    /// Issues a session challenge for the login flow.
    ///
    /// The client must embed the returned identifier and a timestamp into
    /// its verification message before proving.
    pub async fn issue_challenge(&self) -> Result<String> {
        counter!("auth.challenge.requests").increment(1);
        self.sessions.issue().await
    }

    /// Verifies a login proof against a previously issued session.
    pub async fn verify(&self, request: VerificationRequest) -> Result<()> {
        let start = Instant::now();
        counter!("auth.verify.requests").increment(1);

        let outcome = self.verify_inner(request).await;

        match &outcome {
            Ok(()) => {}
            Err(Error::ReplayDetected) => {
                counter!("auth.verify.replay_detected").increment(1);
            }
            Err(_) => {
                counter!("auth.verify.rejected").increment(1);
            }
        }
        histogram!("auth.verify.duration_seconds").record(start.elapsed().as_secs_f64());

        outcome
    }

    async fn verify_inner(&self, request: VerificationRequest) -> Result<()> {
        let public = Secp256k1::element_from_hex(&request.public_key)?;
        let proof = Proof::from_hex(&request.proof)?;
        Self::validate_token("sessionId", &request.session_id)?;
        Self::validate_token("nullifier", &request.nullifier)?;

        // A missing or stale session rejects before any proof work; a
        // replayed session id must never reach the verifier.
        self.sessions.validate(&request.session_id).await?;

        let record = self
            .store
            .find_by_public_key(&request.public_key)
            .await?
            .ok_or(Error::IdentityNotFound)?;

        let message = Message::Verification {
            session_id: request.session_id.clone(),
            timestamp_millis: request.timestamp,
        };

        if let Err(e) = verify_proof(&public, &proof, &message.to_bytes()) {
            debug!("verification rejected: {e}");
            return Err(e);
        }

        let entry = LedgerEntry {
            public_key_hex: record.public_key_hex,
            proof: request.proof.clone(),
            verified_at_millis: now_millis(),
        };

        if !self.ledger.try_consume(&request.nullifier, entry).await? {
            warn!(nullifier = %request.nullifier, "replay detected: nullifier already consumed");
            return Err(Error::ReplayDetected);
        }

        // Losing this race means a concurrent request already spent the
        // session. The nullifier recorded above stays recorded either way;
        // ledger entries are never removed.
        if !self.sessions.consume(&request.session_id).await {
            debug!("verification rejected: session consumed concurrently");
            return Err(Error::SessionInvalid);
        }

        info!("verification accepted");
        Ok(())
    }
}
