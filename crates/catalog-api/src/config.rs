//! API server configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub upload: UploadConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Basic-auth credential table
///
/// Expected passwords are keyed by uppercased username. An empty table means
/// every request is denied; the guard always fails closed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub credentials: HashMap<String, String>,
}

/// Upload-link issuing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Bucket the issued URLs write into.
    pub bucket: String,
    /// Lifetime of issued URLs, in seconds.
    pub url_ttl_secs: u64,
}

impl AuthConfig {
    /// Parse a `user=password,user2=password2` credential list, uppercasing
    /// usernames.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut credentials = HashMap::new();

        for pair in raw.split(',').filter(|p| !p.trim().is_empty()) {
            let (user, password) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Invalid credential entry: {:?}", pair))?;

            if user.trim().is_empty() {
                anyhow::bail!("Credential entry has an empty username");
            }

            credentials.insert(user.trim().to_uppercase(), password.to_string());
        }

        Ok(Self { credentials })
    }
}

impl ApiConfig {
    /// Load configuration from environment and defaults
    ///
    /// Environment variables:
    /// - `API_HOST` / `API_PORT`: bind address (default: 127.0.0.1:8080)
    /// - `API_SHUTDOWN_TIMEOUT`: graceful shutdown window (default: 30)
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origins (default: *)
    /// - `BASIC_AUTH_CREDENTIALS`: `user=password` pairs, comma-separated
    /// - `IMPORT_BUCKET_NAME`: import bucket (required)
    /// - `UPLOAD_URL_TTL_SECS`: upload URL lifetime (default: 60)
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = ApiConfig {
            server: ServerConfig {
                host: std::env::var("API_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: std::env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: std::env::var("API_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            auth: match std::env::var("BASIC_AUTH_CREDENTIALS") {
                Ok(raw) => AuthConfig::parse(&raw)?,
                Err(_) => AuthConfig::default(),
            },
            upload: UploadConfig {
                bucket: std::env::var("IMPORT_BUCKET_NAME")
                    .map_err(|_| anyhow::anyhow!("IMPORT_BUCKET_NAME must be set"))?,
                url_ttl_secs: std::env::var("UPLOAD_URL_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(catalog_import::config::DEFAULT_UPLOAD_URL_TTL_SECS),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.upload.bucket.trim().is_empty() {
            anyhow::bail!("Import bucket name cannot be empty");
        }

        if self.upload.url_ttl_secs == 0 {
            anyhow::bail!("Upload URL lifetime must be greater than 0");
        }

        if self.auth.credentials.is_empty() {
            tracing::warn!(
                "No basic-auth credentials configured - every request will be denied"
            );
        }

        Ok(())
    }
}
