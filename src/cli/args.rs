//! CLI argument definitions

use clap::Parser;

/// Auth API server for the marketplace backend
#[derive(Debug, Parser)]
#[command(name = "digimart", version, about)]
pub struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(long, short, default_value_t = 3000)]
    pub port: u16,

    /// Allowed CORS origin (repeatable); defaults to the dev origins
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,

    /// Set the Secure attribute on session cookies (requires TLS)
    #[arg(long)]
    pub secure_cookies: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["digimart"]);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 3000);
        assert!(args.cors_origins.is_empty());
        assert!(!args.secure_cookies);
    }

    #[test]
    fn test_repeatable_origins() {
        let args = Args::parse_from([
            "digimart",
            "--port",
            "8080",
            "--cors-origin",
            "https://shop.example.com",
            "--cors-origin",
            "https://admin.example.com",
        ]);
        assert_eq!(args.port, 8080);
        assert_eq!(args.cors_origins.len(), 2);
    }
}
