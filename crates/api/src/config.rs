use std::path::PathBuf;

use vendorhub_core::contract::DEFAULT_EXPIRY_WINDOW_DAYS;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL URL. In-memory storage is used when unset.
    pub database_url: Option<String>,
    /// Directory uploaded contract documents are written to.
    pub document_dir: PathBuf,
    /// Public URL prefix the document directory is served under.
    pub document_base_url: String,
    /// Maximum accepted document upload size in bytes.
    pub max_upload_bytes: usize,
    /// Default "expiring soon" window in days.
    pub expiry_window_days: i64,
    /// Vendor names offered when running without a database.
    pub seed_vendor_names: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                   |
    /// |------------------------|-------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                 |
    /// | `PORT`                 | `3000`                                    |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                   |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                      |
    /// | `DATABASE_URL`         | unset (in-memory storage)                 |
    /// | `DOCUMENT_DIR`         | `./data/documents`                        |
    /// | `DOCUMENT_BASE_URL`    | `http://localhost:<PORT>/documents`       |
    /// | `MAX_UPLOAD_BYTES`     | `20971520` (20 MiB)                       |
    /// | `EXPIRY_WINDOW_DAYS`   | `30`                                      |
    /// | `VENDOR_NAMES`         | empty                                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let document_dir: PathBuf = std::env::var("DOCUMENT_DIR")
            .unwrap_or_else(|_| "./data/documents".into())
            .into();

        let document_base_url = std::env::var("DOCUMENT_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}/documents"));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (20 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let expiry_window_days: i64 = std::env::var("EXPIRY_WINDOW_DAYS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_WINDOW_DAYS.to_string())
            .parse()
            .expect("EXPIRY_WINDOW_DAYS must be a valid i64");

        let seed_vendor_names = split_list(&std::env::var("VENDOR_NAMES").unwrap_or_default());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            document_dir,
            document_base_url,
            max_upload_bytes,
            expiry_window_days,
            seed_vendor_names,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
