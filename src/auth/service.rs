//! # Session Principal Manager
//!
//! Orchestrates registration, login, logout, and per-request principal
//! resolution over an injected credential store and session store.
//!
//! Per session identifier the lifecycle is
//! `Unauthenticated -> Authenticated -> (Destroyed | Expired)`:
//! only `register`/`login` authenticate, `logout` destroys, and an
//! expired record reads as unauthenticated and is collected by the
//! store.
//!
//! The guards are plain functions returning a typed result; the route
//! layer composes them explicitly instead of relying on middleware
//! ordering.

use std::sync::Arc;

use chrono::Utc;

use super::crypto::{self, dummy_verify, generate_session_id};
use super::errors::{AuthError, AuthResult};
use super::principal::{LoginRequest, NewPrincipal, RegisterRequest, SessionPrincipal};
use super::session::{SessionConfig, SessionRecord, SessionStore};
use super::store::CredentialStore;

/// Normalize an email for storage and lookup: trim surrounding
/// whitespace and lowercase (ASCII).
///
/// Applied identically by registration's duplicate check, login's
/// lookup, and the stored form, so the three can never disagree.
fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_email(email: &str) -> AuthResult<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidInput(
            "a valid email address is required".to_string(),
        ));
    }
    Ok(())
}

/// Session principal manager.
///
/// Each operation is a short-lived request-scoped unit of work; the
/// injected stores are the only shared state.
pub struct AuthService<C: CredentialStore, S: SessionStore> {
    credentials: Arc<C>,
    sessions: Arc<S>,
    config: SessionConfig,
}

impl<C: CredentialStore, S: SessionStore> AuthService<C, S> {
    pub fn new(credentials: C, sessions: S, config: SessionConfig) -> Self {
        Self {
            credentials: Arc::new(credentials),
            sessions: Arc::new(sessions),
            config,
        }
    }

    /// Register a new principal and authenticate it.
    ///
    /// The new principal is never an admin; elevation is an
    /// administrative operation outside this core. Returns the fresh
    /// session identifier and the projection.
    pub fn register(&self, request: RegisterRequest) -> AuthResult<(String, SessionPrincipal)> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;

        if self.credentials.find_by_email(&email)?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = crypto::hash_password(&request.password)?;
        let principal = self.credentials.insert(NewPrincipal {
            email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            is_admin: false,
            is_verified: false,
        })?;

        tracing::info!(principal_id = principal.id, "registered new principal");

        let projection = SessionPrincipal::from(&principal);
        let session_id = self.establish_session(&projection)?;
        Ok((session_id, projection))
    }

    /// Authenticate an email/password pair.
    ///
    /// Fails with the same undifferentiated [`AuthError::InvalidCredentials`]
    /// whether the email is unknown or the password is wrong, and pays a
    /// dummy KDF on the unknown-email path so the two cost the same.
    pub fn login(&self, request: LoginRequest) -> AuthResult<(String, SessionPrincipal)> {
        // Bound the password before any store traffic or KDF work
        if request.password.is_empty() || request.password.len() > crypto::MAX_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(
                "password must be non-empty and of sane length".to_string(),
            ));
        }

        let email = normalize_email(&request.email);
        let principal = match self.credentials.find_by_email(&email)? {
            Some(principal) => principal,
            None => {
                dummy_verify(&request.password);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !crypto::verify_password(&request.password, &principal.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(principal_id = principal.id, "login succeeded");

        let projection = SessionPrincipal::from(&principal);
        let session_id = self.establish_session(&projection)?;
        Ok((session_id, projection))
    }

    /// Destroy the session for `session_id`. Idempotent.
    pub fn logout(&self, session_id: &str) -> AuthResult<()> {
        self.sessions.delete(session_id)
    }

    /// Resolve the principal for a session identifier.
    ///
    /// Absent and expired sessions both read as `None`. A live session
    /// has its expiry slid forward. The returned projection is the
    /// snapshot taken at authentication time; it is not re-read from
    /// the credential store.
    pub fn resolve_principal(&self, session_id: &str) -> AuthResult<Option<SessionPrincipal>> {
        let record = match self.sessions.get(session_id)? {
            Some(record) => record,
            None => return Ok(None),
        };

        // Sliding window: two concurrent refreshes may race, but the
        // write only ever extends the session.
        let refreshed = SessionRecord {
            expires_at: Utc::now() + self.config.ttl,
            ..record
        };
        self.sessions.put(session_id, refreshed.clone())?;

        Ok(Some(refreshed.principal))
    }

    /// Gate: require a logged-in identity.
    pub fn require_authenticated(&self, session_id: &str) -> AuthResult<SessionPrincipal> {
        self.resolve_principal(session_id)?
            .ok_or(AuthError::Unauthorized)
    }

    /// Gate: require a logged-in admin.
    pub fn require_admin(&self, session_id: &str) -> AuthResult<SessionPrincipal> {
        let principal = self.require_authenticated(session_id)?;
        if !principal.is_admin {
            return Err(AuthError::Forbidden);
        }
        Ok(principal)
    }

    /// Number of registered principals (admin dashboard)
    pub fn registered_count(&self) -> AuthResult<u64> {
        self.credentials.count()
    }

    /// The credential store this service was built over
    pub fn credentials(&self) -> &Arc<C> {
        &self.credentials
    }

    /// The session store this service was built over
    pub fn sessions(&self) -> &Arc<S> {
        &self.sessions
    }

    fn establish_session(&self, principal: &SessionPrincipal) -> AuthResult<String> {
        let session_id = generate_session_id();
        let now = Utc::now();
        self.sessions.put(
            &session_id,
            SessionRecord {
                principal: principal.clone(),
                created_at: now,
                expires_at: now + self.config.ttl,
            },
        )?;
        Ok(session_id)
    }
}
