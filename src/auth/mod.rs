//! # Auth Module
//!
//! Credential verification and session-principal lifecycle: password
//! hashing and verification, the session principal projection, the
//! injected credential/session stores, and the route-guard gates.

pub mod errors;
pub mod crypto;
pub mod principal;
pub mod store;
pub mod session;
pub mod service;

pub use errors::{AuthError, AuthResult};
pub use principal::{LoginRequest, NewPrincipal, Principal, RegisterRequest, SessionPrincipal};
pub use service::AuthService;
pub use session::{InMemorySessionStore, SessionConfig, SessionRecord, SessionStore};
pub use store::{CredentialStore, InMemoryCredentialStore};
