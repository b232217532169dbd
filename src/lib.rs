//! digimart - session-based authentication core for a digital-goods
//! marketplace
//!
//! Credential verification (salted-hash passwords), the session
//! principal lifecycle, and the HTTP boundary that serves them.

pub mod auth;
pub mod cli;
pub mod http_server;
