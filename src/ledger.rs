//! Replay prevention: the nullifier ledger.
//!
//! A nullifier is an opaque one-time token submitted with every
//! verification attempt. Once a verification succeeds, its nullifier is
//! recorded permanently; any later attempt carrying the same value is a
//! replay and must be rejected.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::protocol::ProofHex;
use crate::Result;

/// Audit record stored beside a consumed nullifier.
#[derive(Clone, Debug)]
pub struct LedgerEntry {
    /// Public key the accepted proof verified against.
    pub public_key_hex: String,
    /// The accepted proof, kept for audit.
    pub proof: ProofHex,
    /// Unix timestamp (millis) of acceptance.
    pub verified_at_millis: u64,
}

/// Durable set of consumed nullifiers.
///
/// Implementations must make [`try_consume`](NullifierLedger::try_consume) a
/// single atomic conditional insert with respect to concurrent calls
/// carrying the same nullifier; a separate existence check followed by an
/// insert does not satisfy this contract. A recorded nullifier is terminal:
/// nothing in this crate removes one.
#[async_trait]
pub trait NullifierLedger: Send + Sync {
    /// Atomic check-and-insert.
    ///
    /// Returns `false` when the nullifier was already present, in which case
    /// no state changes.
    async fn try_consume(&self, nullifier: &str, entry: LedgerEntry) -> Result<bool>;

    /// Whether the nullifier has been consumed.
    async fn contains(&self, nullifier: &str) -> Result<bool>;
}

/// In-memory ledger for tests and single-process deployments.
pub struct MemoryNullifierLedger {
    entries: Arc<RwLock<HashMap<String, LedgerEntry>>>,
}

impl MemoryNullifierLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of consumed nullifiers.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no nullifier has been consumed yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryNullifierLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryNullifierLedger {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

#[async_trait]
impl NullifierLedger for MemoryNullifierLedger {
    async fn try_consume(&self, nullifier: &str, entry: LedgerEntry) -> Result<bool> {
        let mut entries = self.entries.write().await;
        match entries.entry(nullifier.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(true)
            }
        }
    }

    async fn contains(&self, nullifier: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(nullifier))
    }
}
