//! Import pipeline configuration

use serde::{Deserialize, Serialize};

// ============================================================================
// Import Configuration Constants
// ============================================================================

/// Default AWS region when `AWS_REGION` is not set.
pub const DEFAULT_REGION: &str = "us-east-2";

/// Default lifetime of an issued upload URL, in seconds.
pub const DEFAULT_UPLOAD_URL_TTL_SECS: u64 = 60;

/// Import pipeline configuration
///
/// All values are injected from the environment; a missing bucket or queue
/// endpoint is a startup error, never a runtime data error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Bucket holding staged and parsed objects.
    pub bucket: String,
    /// Work queue endpoint receiving one message per decoded row.
    pub queue_url: String,
    /// AWS region for the storage and queue clients.
    pub region: String,
    /// Lifetime of issued upload URLs, in seconds.
    pub upload_url_ttl_secs: u64,
}

impl ImportConfig {
    /// Load configuration from environment and defaults
    ///
    /// Environment variables:
    /// - `IMPORT_BUCKET_NAME`: import bucket (required)
    /// - `SQS_URL`: work queue URL (required)
    /// - `AWS_REGION`: region (default: us-east-2)
    /// - `UPLOAD_URL_TTL_SECS`: upload URL lifetime (default: 60)
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = ImportConfig {
            bucket: std::env::var("IMPORT_BUCKET_NAME")
                .map_err(|_| anyhow::anyhow!("IMPORT_BUCKET_NAME must be set"))?,
            queue_url: std::env::var("SQS_URL")
                .map_err(|_| anyhow::anyhow!("SQS_URL must be set"))?,
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            upload_url_ttl_secs: std::env::var("UPLOAD_URL_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_UPLOAD_URL_TTL_SECS),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bucket.trim().is_empty() {
            anyhow::bail!("Import bucket name cannot be empty");
        }

        if self.queue_url.trim().is_empty() {
            anyhow::bail!("Queue URL cannot be empty");
        }

        if self.upload_url_ttl_secs == 0 {
            anyhow::bail!("Upload URL lifetime must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ImportConfig {
        ImportConfig {
            bucket: "import-bucket".to_string(),
            queue_url: "https://sqs.us-east-2.amazonaws.com/123456789012/catalog-items".to_string(),
            region: DEFAULT_REGION.to_string(),
            upload_url_ttl_secs: DEFAULT_UPLOAD_URL_TTL_SECS,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_bucket() {
        let mut config = sample_config();
        config.bucket = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_queue_url() {
        let mut config = sample_config();
        config.queue_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_ttl() {
        let mut config = sample_config();
        config.upload_url_ttl_secs = 0;
        assert!(config.validate().is_err());
    }
}
