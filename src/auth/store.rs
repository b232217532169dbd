//! # Credential Store Adapter
//!
//! Boundary contract for the persistence layer that owns principals.
//! The relational store behind it is an external collaborator; this
//! module only fixes the contract and ships an in-memory implementation
//! used by tests and the default server wiring.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use super::errors::{AuthError, AuthResult};
use super::principal::{NewPrincipal, Principal};

/// Credential store contract.
///
/// Lookups use exact equality on the stored (normalized) email form;
/// normalization itself is the caller's job so that the duplicate check
/// and the login lookup can never disagree.
pub trait CredentialStore: Send + Sync {
    /// Find a principal by email
    fn find_by_email(&self, email: &str) -> AuthResult<Option<Principal>>;

    /// Find a principal by identifier
    fn find_by_id(&self, id: i64) -> AuthResult<Option<Principal>>;

    /// Persist a new principal, assigning its identifier
    fn insert(&self, new: NewPrincipal) -> AuthResult<Principal>;

    /// Number of persisted principals
    fn count(&self) -> AuthResult<u64>;
}

/// In-memory credential store for tests and development.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    principals: RwLock<Vec<Principal>>,
    next_id: AtomicI64,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            principals: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_by_email(&self, email: &str) -> AuthResult<Option<Principal>> {
        let principals = self
            .principals
            .read()
            .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;
        Ok(principals.iter().find(|p| p.email == email).cloned())
    }

    fn find_by_id(&self, id: i64) -> AuthResult<Option<Principal>> {
        let principals = self
            .principals
            .read()
            .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;
        Ok(principals.iter().find(|p| p.id == id).cloned())
    }

    fn insert(&self, new: NewPrincipal) -> AuthResult<Principal> {
        let mut principals = self
            .principals
            .write()
            .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;

        if principals.iter().any(|p| p.email == new.email) {
            return Err(AuthError::DuplicateEmail);
        }

        let principal = Principal {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            is_admin: new.is_admin,
            is_verified: new.is_verified,
        };
        principals.push(principal.clone());
        Ok(principal)
    }

    fn count(&self) -> AuthResult<u64> {
        let principals = self
            .principals
            .read()
            .map_err(|_| AuthError::Storage("Lock poisoned".to_string()))?;
        Ok(principals.len() as u64)
    }
}
