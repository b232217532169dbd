//! # CLI Module
//!
//! Parses arguments, initializes logging, and runs the HTTP server.

pub mod args;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::http_server::{HttpServer, HttpServerConfig};
use args::Args;

/// Parse arguments and run the server until shutdown.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = HttpServerConfig {
        host: args.host,
        port: args.port,
        cookie_secure: args.secure_cookies,
        ..Default::default()
    };
    if !args.cors_origins.is_empty() {
        config.cors_origins = args.cors_origins;
    }

    let server = HttpServer::with_config(config);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server.start())?;
    Ok(())
}
