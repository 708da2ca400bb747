//! In-memory server-side session storage.
//!
//! Sessions are keyed by a digest of the cookie token; raw tokens are never
//! kept. Expired entries are evicted when they are looked up, and every new
//! session sweeps out the ones nobody came back for.

use anyhow::Result;
use secrecy::SecretString;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use super::utils::{generate_session_token, hash_session_token};
use crate::users::{Role, User};

#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: Instant,
}

pub struct SessionStore {
    secret: SecretString,
    ttl: Duration,
    sessions: RwLock<HashMap<Vec<u8>, SessionRecord>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(secret: SecretString, ttl: Duration) -> Self {
        Self {
            secret,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a session for `user` and return the raw token for the cookie.
    ///
    /// # Errors
    /// Returns an error if the token cannot be generated.
    pub async fn create(&self, user: &User) -> Result<String> {
        let token = generate_session_token()?;
        let record = SessionRecord {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            created_at: Instant::now(),
        };
        let mut sessions = self.sessions.write().await;
        let purged = self.retain_live(&mut sessions);
        if purged > 0 {
            debug!(purged, "dropped expired sessions");
        }
        sessions.insert(hash_session_token(&self.secret, &token), record);
        Ok(token)
    }

    /// Drop every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.retain_live(&mut sessions)
    }

    fn retain_live(&self, sessions: &mut HashMap<Vec<u8>, SessionRecord>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, record| record.created_at.elapsed() < self.ttl);
        before - sessions.len()
    }

    /// Resolve a token to its session, dropping it if it has expired.
    pub async fn lookup(&self, token: &str) -> Option<SessionRecord> {
        let key = hash_session_token(&self.secret, token);
        let record = self.sessions.read().await.get(&key).cloned()?;

        if record.created_at.elapsed() >= self.ttl {
            debug!(user_id = record.user_id, "session expired");
            self.sessions.write().await.remove(&key);
            return None;
        }

        Some(record)
    }

    /// Returns `true` if a session was removed.
    pub async fn remove(&self, token: &str) -> bool {
        let key = hash_session_token(&self.secret, token);
        self.sessions.write().await.remove(&key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}
