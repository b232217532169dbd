//! # HTTP Server Module
//!
//! Axum boundary for the auth core.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/register`, `/api/login`, `/api/logout` - Session lifecycle
//! - `/api/user` - Current principal (authenticated)
//! - `/api/admin/stats` - Registration stats (admin-gated)

pub mod config;
pub mod server;
pub mod auth_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
