//! # Principals
//!
//! The full persisted identity record and the hash-free projection of it
//! that lives in a session.

use serde::{Deserialize, Serialize};

/// Full identity record as persisted by the credential store.
///
/// Owned exclusively by the credential store; mutated only through
/// explicit create/update operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Unique, immutable numeric identifier (assigned by the store)
    pub id: i64,

    /// Email address (unique, stored in normalized form)
    pub email: String,

    /// Salted password hash (`hex(key).hex(salt)`, never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Whether this principal may pass the admin gate
    pub is_admin: bool,

    /// Whether the email address has been verified
    pub is_verified: bool,
}

/// A principal about to be persisted (no identifier yet).
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub is_admin: bool,
    pub is_verified: bool,
}

/// The subset of [`Principal`] exposed after authentication succeeds.
///
/// Never contains the password hash. Created at login or registration
/// and held for the lifetime of a session; it is a point-in-time
/// snapshot, not re-synced if the underlying record changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrincipal {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub is_admin: bool,
}

impl From<&Principal> for SessionPrincipal {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            email: principal.email.clone(),
            first_name: principal.first_name.clone(),
            last_name: principal.last_name.clone(),
            phone_number: principal.phone_number.clone(),
            is_admin: principal.is_admin,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_principal() -> Principal {
        Principal {
            id: 7,
            email: "a@x.com".to_string(),
            password_hash: "deadbeef.cafe".to_string(),
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            phone_number: None,
            is_admin: false,
            is_verified: false,
        }
    }

    #[test]
    fn test_projection_copies_identity_fields() {
        let principal = sample_principal();
        let session = SessionPrincipal::from(&principal);

        assert_eq!(session.id, 7);
        assert_eq!(session.email, "a@x.com");
        assert_eq!(session.first_name.as_deref(), Some("A"));
        assert!(!session.is_admin);
    }

    #[test]
    fn test_projection_has_no_hash_field() {
        let session = SessionPrincipal::from(&sample_principal());
        let json = serde_json::to_string(&session).unwrap();

        assert!(!json.contains("password"));
        assert!(!json.contains("deadbeef"));
    }

    #[test]
    fn test_principal_serialization_omits_hash() {
        let json = serde_json::to_string(&sample_principal()).unwrap();

        assert!(!json.contains("password_hash"));
        assert!(!json.contains("deadbeef"));
    }

    #[test]
    fn test_session_principal_serde_roundtrip() {
        // Session stores persist the projection in serialized form
        let session = SessionPrincipal::from(&sample_principal());
        let json = serde_json::to_string(&session).unwrap();
        let restored: SessionPrincipal = serde_json::from_str(&json).unwrap();

        assert_eq!(session, restored);
    }
}
