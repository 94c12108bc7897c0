//! Enrollment record persistence interface.
//!
//! The core does not choose a persistence technology; it talks to a narrow
//! store trait and ships an in-memory implementation for tests and
//! single-process deployments.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::protocol::ProofHex;
use crate::{Error, Result};

/// A completed enrollment.
///
/// Created once per identity and immutable thereafter. Both `id_hash` and
/// `public_key_hex` are unique across all records.
#[derive(Clone, Debug)]
pub struct EnrollmentRecord {
    /// Public point the identity authenticates with, SEC1 compressed hex.
    pub public_key_hex: String,
    /// Hex identity commitment submitted at enrollment.
    pub commitment_hex: String,
    /// Hex digest of the identity document number.
    pub id_hash: String,
    /// Hex digest of the full name.
    pub name_hash: String,
    /// Hex digest of the date of birth.
    pub dob_hash: String,
    /// Approval flag from the enrollment screening step.
    pub approval: u32,
    /// Opaque ciphertext blob; encryption is the client's concern.
    pub encrypted_pii: String,
    /// The proof that authorized this enrollment, kept for audit.
    pub proof: ProofHex,
    /// Unix timestamp (millis) when the record was created.
    pub created_at_millis: u64,
}

/// Durable unique-keyed store of enrollment records.
///
/// Implementations must enforce both uniqueness constraints atomically with
/// respect to concurrent inserts.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Inserts a record, rejecting [`Error::DuplicateIdentity`] when either
    /// the public key or the id hash is already enrolled.
    async fn insert(&self, record: EnrollmentRecord) -> Result<()>;

    /// Looks up the record registered under a public key.
    async fn find_by_public_key(&self, public_key_hex: &str) -> Result<Option<EnrollmentRecord>>;

    /// Looks up the record registered under an identity hash.
    async fn find_by_id_hash(&self, id_hash: &str) -> Result<Option<EnrollmentRecord>>;
}

#[derive(Default)]
struct StoreInner {
    by_public_key: HashMap<String, EnrollmentRecord>,
    id_index: HashSet<String>,
}

/// In-memory store for tests and single-process deployments.
pub struct MemoryEnrollmentStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryEnrollmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
        }
    }

    /// Number of enrolled identities.
    pub async fn record_count(&self) -> usize {
        self.inner.read().await.by_public_key.len()
    }
}

impl Default for MemoryEnrollmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryEnrollmentStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl EnrollmentStore for MemoryEnrollmentStore {
    async fn insert(&self, record: EnrollmentRecord) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.by_public_key.contains_key(&record.public_key_hex) {
            return Err(Error::DuplicateIdentity(
                "public key already enrolled".to_string(),
            ));
        }
        if inner.id_index.contains(&record.id_hash) {
            return Err(Error::DuplicateIdentity("id already enrolled".to_string()));
        }

        inner.id_index.insert(record.id_hash.clone());
        inner
            .by_public_key
            .insert(record.public_key_hex.clone(), record);

        Ok(())
    }

    async fn find_by_public_key(&self, public_key_hex: &str) -> Result<Option<EnrollmentRecord>> {
        Ok(self
            .inner
            .read()
            .await
            .by_public_key
            .get(public_key_hex)
            .cloned())
    }

    async fn find_by_id_hash(&self, id_hash: &str) -> Result<Option<EnrollmentRecord>> {
        Ok(self
            .inner
            .read()
            .await
            .by_public_key
            .values()
            .find(|record| record.id_hash == id_hash)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(public_key: &str, id_hash: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            public_key_hex: public_key.to_string(),
            commitment_hex: "aa".to_string(),
            id_hash: id_hash.to_string(),
            name_hash: "bb".to_string(),
            dob_hash: "cc".to_string(),
            approval: 1,
            encrypted_pii: "{}".to_string(),
            proof: ProofHex {
                commitment_r: "02dd".to_string(),
                challenge: "ee".to_string(),
                response: "ff".to_string(),
            },
            created_at_millis: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let store = MemoryEnrollmentStore::new();
        store.insert(record("pk1", "id1")).await.unwrap();

        assert!(store.find_by_public_key("pk1").await.unwrap().is_some());
        assert!(store.find_by_id_hash("id1").await.unwrap().is_some());
        assert!(store.find_by_public_key("pk2").await.unwrap().is_none());
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn rejects_duplicate_public_key() {
        let store = MemoryEnrollmentStore::new();
        store.insert(record("pk1", "id1")).await.unwrap();

        let result = store.insert(record("pk1", "id2")).await;
        assert!(matches!(result, Err(Error::DuplicateIdentity(_))));
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn rejects_duplicate_id_hash() {
        let store = MemoryEnrollmentStore::new();
        store.insert(record("pk1", "id1")).await.unwrap();

        let result = store.insert(record("pk2", "id1")).await;
        assert!(matches!(result, Err(Error::DuplicateIdentity(_))));
        assert_eq!(store.record_count().await, 1);
    }
}
