//! # Cryptographic Utilities
//!
//! Password hashing and session identifier generation.
//!
//! Stored credentials are `hex(derivedKey) + "." + hex(salt)` composites:
//! a 64-byte key derived from the password and a fresh 16-byte random salt
//! via Argon2id. The salt is never reused; the key is never decryptable,
//! only comparable.
//!
//! ## Invariants
//! - Passwords are only ever stored as salted derived keys
//! - Constant-time comparison for all secrets

use std::sync::OnceLock;

use argon2::{password_hash::rand_core::OsRng, Argon2};
use rand::RngCore;
use subtle::ConstantTimeEq;

use super::errors::{AuthError, AuthResult};

/// Length of the derived key in bytes
pub const DERIVED_KEY_LEN: usize = 64;

/// Length of the per-password random salt in bytes
pub const SALT_LEN: usize = 16;

/// Upper bound on accepted password length, in bytes.
///
/// The KDF cost scales with input size; unbounded input is a
/// denial-of-service vector.
pub const MAX_PASSWORD_LEN: usize = 512;

fn check_password_bounds(password: &str) -> AuthResult<()> {
    if password.is_empty() {
        return Err(AuthError::InvalidInput(
            "password must not be empty".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AuthError::InvalidInput(format!(
            "password must not exceed {} bytes",
            MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Derive a fixed-length key from a password and salt using Argon2id
/// with library-default work factors.
fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; DERIVED_KEY_LEN], argon2::Error> {
    let mut out = [0u8; DERIVED_KEY_LEN];
    Argon2::default().hash_password_into(password.as_bytes(), salt, &mut out)?;
    Ok(out)
}

/// Hash a password into a storable `hash.salt` composite.
///
/// Generates a fresh 16-byte salt per call; hashing the same password
/// twice yields two different composites that both verify.
pub fn hash_password(password: &str) -> AuthResult<String> {
    check_password_bounds(password)?;

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(password, &salt).map_err(|_| AuthError::HashingFailed)?;
    Ok(format!("{}.{}", hex::encode(key), hex::encode(salt)))
}

/// Verify a password against a stored `hash.salt` composite.
///
/// Re-derives the key with the stored salt and compares in constant
/// time. A derived key of a different length than the stored one
/// compares unequal without revealing how much of the prefix matched.
pub fn verify_password(password: &str, stored: &str) -> AuthResult<bool> {
    check_password_bounds(password)?;

    let (hash_hex, salt_hex) = stored.split_once('.').ok_or(AuthError::MalformedHash)?;
    if hash_hex.is_empty() || salt_hex.is_empty() {
        return Err(AuthError::MalformedHash);
    }

    let stored_key = hex::decode(hash_hex).map_err(|_| AuthError::MalformedHash)?;
    let salt = hex::decode(salt_hex).map_err(|_| AuthError::MalformedHash)?;

    // A salt the KDF rejects (e.g. too short) is a corrupt record,
    // not a wrong password.
    let derived = derive_key(password, &salt).map_err(|_| AuthError::MalformedHash)?;

    Ok(stored_key.ct_eq(&derived[..]).into())
}

/// Run one KDF invocation against a fixed dummy credential, discarding
/// the result.
///
/// `login` calls this when the email is unknown so that the not-found
/// path costs the same as a wrong-password verification and the two
/// are indistinguishable by timing.
pub fn dummy_verify(password: &str) {
    static DUMMY: OnceLock<String> = OnceLock::new();
    let stored = DUMMY.get_or_init(|| {
        hash_password("dummy-timing-equalizer").unwrap_or_else(|_| {
            // Unreachable for a well-formed constant input; fall back to
            // a fixed composite so the KDF still runs.
            format!("{}.{}", "00".repeat(DERIVED_KEY_LEN), "00".repeat(SALT_LEN))
        })
    });
    if !password.is_empty() && password.len() <= MAX_PASSWORD_LEN {
        let _ = verify_password(password, stored);
    }
}

/// Generate an unguessable session identifier.
///
/// Returns a 256-bit (32-byte) random value as URL-safe base64. The
/// identifier is a lookup key into server-side state, never a
/// self-contained token.
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

/// Constant-time comparison of two byte slices
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let password = "secret123";
        let stored = hash_password(password).unwrap();

        // Composite should never contain the plaintext
        assert!(!stored.contains(password));

        assert!(verify_password(password, &stored).unwrap());
        assert!(!verify_password("wrong", &stored).unwrap());
    }

    #[test]
    fn test_composite_format() {
        let stored = hash_password("secret123").unwrap();
        let (hash_hex, salt_hex) = stored.split_once('.').unwrap();

        assert_eq!(hash_hex.len(), DERIVED_KEY_LEN * 2);
        assert_eq!(salt_hex.len(), SALT_LEN * 2);
        assert!(hash_hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(salt_hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let password = "same_password";
        let a = hash_password(password).unwrap();
        let b = hash_password(password).unwrap();

        // Fresh salt each time, so the composites differ
        assert_ne!(a, b);

        // Both still verify
        assert!(verify_password(password, &a).unwrap());
        assert!(verify_password(password, &b).unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(
            hash_password(""),
            Err(AuthError::InvalidInput(_))
        ));
        let stored = hash_password("x").unwrap();
        assert!(matches!(
            verify_password("", &stored),
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_oversized_password_rejected() {
        let long = "a".repeat(MAX_PASSWORD_LEN + 1);
        assert!(matches!(
            hash_password(&long),
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_malformed_stored_value() {
        for bad in ["no-dot-here", ".abcd", "abcd.", "", "zz.zz", "abcd.not-hex"] {
            assert!(
                matches!(verify_password("pw", bad), Err(AuthError::MalformedHash)),
                "expected MalformedHash for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_truncated_hash_compares_unequal() {
        let stored = hash_password("secret123").unwrap();
        let (hash_hex, salt_hex) = stored.split_once('.').unwrap();

        // Valid hex, wrong length: must compare false, not error
        let truncated = format!("{}.{}", &hash_hex[..64], salt_hex);
        assert!(!verify_password("secret123", &truncated).unwrap());
    }

    #[test]
    fn test_session_id_generation() {
        let a = generate_session_id();
        let b = generate_session_id();

        assert_ne!(a, b);
        assert!(a.len() >= 32);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hello!"));
    }

    #[test]
    fn test_dummy_verify_does_not_panic() {
        dummy_verify("anything");
        dummy_verify("");
    }
}
