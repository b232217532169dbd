//! # Session Store
//!
//! Server-side session state keyed by an opaque session identifier.
//!
//! The store is injected into the session principal manager so it can be
//! backed by any keyed store with TTL support; an in-memory
//! implementation ships for tests and single-process deployments.
//!
//! ## Invariants
//! - Sessions expire at stated time; an expired record is treated as
//!   absent on next access and garbage-collected, never reanimated
//! - Logout invalidates immediately
//! - Each authenticated access slides the expiry forward

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::principal::SessionPrincipal;

/// Server-side session record: the serialized principal plus expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Snapshot of the principal at authentication time
    pub principal: SessionPrincipal,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session expires (slides forward on access)
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Session store configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime; refreshed on each authenticated request
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // One week, sliding
            ttl: Duration::days(7),
        }
    }
}

/// Session store contract.
///
/// Concurrent access for different identifiers must not interfere.
/// Concurrent refreshes of the same identifier may race on the expiry
/// write; last-writer-wins is acceptable since a refresh only ever
/// extends the session.
pub trait SessionStore: Send + Sync {
    /// Fetch the live record for an identifier.
    ///
    /// Returns `None` for absent and expired records alike; an expired
    /// record is removed rather than returned.
    fn get(&self, session_id: &str) -> AuthResult<Option<SessionRecord>>;

    /// Create or replace the record for an identifier
    fn put(&self, session_id: &str, record: SessionRecord) -> AuthResult<()>;

    /// Destroy the record for an identifier; absent records are not an error
    fn delete(&self, session_id: &str) -> AuthResult<()>;

    /// Drop all expired records, returning how many were removed
    fn sweep_expired(&self) -> AuthResult<usize>;
}

/// In-memory session store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str) -> AuthResult<Option<SessionRecord>> {
        let now = Utc::now();
        {
            let sessions = self
                .sessions
                .read()
                .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;
            match sessions.get(session_id) {
                Some(record) if !record.is_expired(now) => return Ok(Some(record.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: collect it now rather than waiting for a sweep
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;
        if let Some(record) = sessions.get(session_id) {
            if record.is_expired(now) {
                sessions.remove(session_id);
            }
        }
        Ok(None)
    }

    fn put(&self, session_id: &str, record: SessionRecord) -> AuthResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;
        sessions.insert(session_id.to_string(), record);
        Ok(())
    }

    fn delete(&self, session_id: &str) -> AuthResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;
        sessions.remove(session_id);
        Ok(())
    }

    fn sweep_expired(&self) -> AuthResult<usize> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;
        let now = Utc::now();
        let len_before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(now));
        Ok(len_before - sessions.len())
    }
}
