//! Session challenge lifecycle.
//!
//! A session challenge is issued on demand for the login flow, embedded by
//! the client into its verification message, and consumed exactly once on a
//! successful verification. Sessions left unconsumed past their TTL become
//! unusable and are swept out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

use crate::config::ServiceConfig;
use crate::rng::SecureRng;
use crate::{Error, Result};

/// Number of random bytes in a session identifier.
const SESSION_ID_BYTES: usize = 16;

/// Current Unix time in milliseconds.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| unreachable!("System time is after UNIX_EPOCH"))
        .as_millis() as u64
}

/// A live session challenge.
#[derive(Clone, Debug)]
pub struct SessionData {
    /// Random identifier returned to the client.
    pub session_id: String,
    /// Unix timestamp (millis) at issuance.
    pub issued_at_millis: u64,
    /// Unix timestamp (millis) past which the session is unusable.
    pub expires_at_millis: u64,
}

impl SessionData {
    fn new(session_id: String, ttl_millis: u64) -> Self {
        let issued_at_millis = now_millis();
        Self {
            session_id,
            issued_at_millis,
            expires_at_millis: issued_at_millis.saturating_add(ttl_millis),
        }
    }

    /// Whether the session TTL has elapsed.
    pub fn is_expired(&self) -> bool {
        now_millis() >= self.expires_at_millis
    }
}

/// Issues and consumes single-use session challenges.
///
/// State machine per session: `Issued -> Consumed` or `Issued -> Expired`,
/// both terminal. All mutation happens under a single write lock, so two
/// concurrent [`consume`](SessionManager::consume) calls on the same
/// identifier yield exactly one `true`.
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl_millis: u64,
    max_live: usize,
}

impl SessionManager {
    /// Creates a manager with the configured TTL and capacity.
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_millis: config.session_ttl_secs.saturating_mul(1000),
            max_live: config.max_live_sessions,
        }
    }

    /// Issues a fresh session challenge and returns its identifier.
    ///
    /// Expired entries are swept lazily before the capacity check, so an
    /// unattended server cannot accumulate stale sessions without bound.
    pub async fn issue(&self) -> Result<String> {
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.max_live {
            sessions.retain(|_, data| !data.is_expired());
            if sessions.len() >= self.max_live {
                return Err(Error::Capacity(format!("{} live sessions", self.max_live)));
            }
        }

        let session_id = SecureRng::new().random_hex(SESSION_ID_BYTES);
        sessions.insert(
            session_id.clone(),
            SessionData::new(session_id.clone(), self.ttl_millis),
        );

        Ok(session_id)
    }

    /// Checks that a session exists and is fresh, without consuming it.
    pub async fn validate(&self, session_id: &str) -> Result<SessionData> {
        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            Some(data) if !data.is_expired() => Ok(data.clone()),
            _ => Err(Error::SessionInvalid),
        }
    }

    /// Atomically consumes a session.
    ///
    /// Returns `true` exactly once per issued identifier. Absent, expired,
    /// or already-consumed sessions report `false`; an expired entry is
    /// removed on the way out.
    pub async fn consume(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(session_id) {
            Some(data) => !data.is_expired(),
            None => false,
        }
    }

    /// Sweeps every expired session.
    pub async fn purge_expired(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, data| !data.is_expired());
    }

    /// Number of live (issued, unconsumed) sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            ttl_millis: self.ttl_millis,
            max_live: self.max_live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(ttl_secs: u64, max_live: usize) -> SessionManager {
        SessionManager::new(&ServiceConfig {
            session_ttl_secs: ttl_secs,
            max_live_sessions: max_live,
        })
    }

    #[tokio::test]
    async fn consume_succeeds_exactly_once() {
        let sessions = manager(300, 100);
        let id = sessions.issue().await.unwrap();

        assert!(sessions.validate(&id).await.is_ok());
        assert!(sessions.consume(&id).await);
        assert!(!sessions.consume(&id).await);
        assert!(sessions.validate(&id).await.is_err());
    }

    #[tokio::test]
    async fn unknown_session_is_invalid() {
        let sessions = manager(300, 100);

        assert!(sessions.validate("missing").await.is_err());
        assert!(!sessions.consume("missing").await);
    }

    #[tokio::test]
    async fn expired_session_is_unusable() {
        let sessions = manager(0, 100);
        let id = sessions.issue().await.unwrap();

        assert!(sessions.validate(&id).await.is_err());
        assert!(!sessions.consume(&id).await);
    }

    #[tokio::test]
    async fn capacity_is_enforced() {
        let sessions = manager(300, 2);
        sessions.issue().await.unwrap();
        sessions.issue().await.unwrap();

        assert!(matches!(sessions.issue().await, Err(Error::Capacity(_))));
    }

    #[tokio::test]
    async fn capacity_recovers_after_expiry() {
        let sessions = manager(0, 1);
        sessions.issue().await.unwrap();

        // The only live entry is already expired, so the lazy sweep frees it.
        assert!(sessions.issue().await.is_ok());
    }

    #[tokio::test]
    async fn purge_removes_expired_entries() {
        let sessions = manager(0, 100);
        sessions.issue().await.unwrap();
        sessions.issue().await.unwrap();

        sessions.purge_expired().await;
        assert_eq!(sessions.session_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_consume_has_a_single_winner() {
        let sessions = manager(300, 100);
        let id = sessions.issue().await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let sessions = sessions.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move { sessions.consume(&id).await }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
    }
}
