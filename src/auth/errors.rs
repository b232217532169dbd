//! # Auth Errors
//!
//! Error types for credential verification and session management.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Input Errors
    // ==================

    /// Malformed request data (empty password, over-long password, bad email)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored credential is not a valid `hash.salt` composite
    #[error("Stored credential is malformed")]
    MalformedHash,

    // ==================
    // Authentication Errors
    // ==================

    /// Wrong email or password (generic - never reveal which)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already registered")]
    DuplicateEmail,

    // ==================
    // Authorization Errors
    // ==================

    /// No live session for this request
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated but not an admin
    #[error("Admin privileges required")]
    Forbidden,

    // ==================
    // Internal Errors
    // ==================

    /// Key derivation failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Credential store or session store failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::InvalidInput(_) => 400,
            AuthError::DuplicateEmail => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::Unauthorized => 401,

            // 403 Forbidden
            AuthError::Forbidden => 403,

            // 500 Internal Server Error
            AuthError::MalformedHash => 500,
            AuthError::HashingFailed => 500,
            AuthError::Storage(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::Unauthorized.status_code(), 401);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
        assert_eq!(AuthError::DuplicateEmail.status_code(), 400);
        assert_eq!(AuthError::Storage("down".to_string()).status_code(), 500);
    }

    #[test]
    fn test_invalid_credentials_does_not_leak_field() {
        // The message must not say whether the email or the password was wrong
        let msg = AuthError::InvalidCredentials.to_string().to_lowercase();
        assert!(!msg.contains("not found"));
        assert!(!msg.contains("wrong password"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AuthError::DuplicateEmail.is_client_error());
        assert!(AuthError::Forbidden.is_client_error());
        assert!(!AuthError::MalformedHash.is_client_error());
        assert!(!AuthError::HashingFailed.is_client_error());
    }
}
