//! Object store access
//!
//! The pipeline and the upload-link issuer talk to the file store through the
//! [`ObjectStore`] trait so tests can substitute in-memory fakes; [`Storage`]
//! is the S3 implementation.

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    Client,
};
use catalog_common::{CatalogError, Result};
use std::time::Duration;
use tokio::io::AsyncRead;
use tracing::{debug, info, instrument};

pub mod config;

pub use config::StorageConfig;

/// Streaming body of a fetched object.
pub type ObjectBody = Box<dyn AsyncRead + Send + Unpin>;

/// File-store operations the import service needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Retrieve an object's body as a stream.
    ///
    /// A missing object is `CatalogError::NotFound`; any other backend
    /// failure is `Upstream`.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<ObjectBody>;

    /// Copy an object within a bucket.
    async fn copy(&self, bucket: &str, source_key: &str, dest_key: &str) -> Result<()>;

    /// Delete an object.
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

    /// Issue a time-boxed URL granting a single direct CSV upload to `key`.
    async fn presign_upload(&self, bucket: &str, key: &str, expires_in: Duration)
        -> Result<String>;
}

/// S3-backed object store
#[derive(Clone)]
pub struct Storage {
    client: Client,
}

impl Storage {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        debug!("Initializing storage with config: {:?}", config);

        let region = Region::new(config.region.clone());

        let mut builder = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let credentials = Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "catalog-storage",
                );
                aws_sdk_s3::Config::builder().credentials_provider(credentials)
            },
            // No static keys configured; fall back to the default chain
            // (instance profile, SSO, shared config file).
            _ => {
                let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(region.clone())
                    .load()
                    .await;
                aws_sdk_s3::config::Builder::from(&shared)
            },
        };

        builder = builder
            .region(region)
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(builder.build());

        info!("Storage client initialized");

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for Storage {
    #[instrument(skip(self))]
    async fn fetch(&self, bucket: &str, key: &str) -> Result<ObjectBody> {
        debug!("Fetching s3://{}/{}", bucket, key);

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    CatalogError::NotFound(format!("s3://{}/{}", bucket, key))
                } else {
                    CatalogError::Upstream(format!(
                        "failed to fetch s3://{}/{}: {}",
                        bucket, key, service_err
                    ))
                }
            })?;

        Ok(Box::new(response.body.into_async_read()))
    }

    #[instrument(skip(self))]
    async fn copy(&self, bucket: &str, source_key: &str, dest_key: &str) -> Result<()> {
        debug!(
            "Copying s3://{}/{} to s3://{}/{}",
            bucket, source_key, bucket, dest_key
        );

        let copy_source = format!("{}/{}", bucket, source_key);

        self.client
            .copy_object()
            .bucket(bucket)
            .copy_source(&copy_source)
            .key(dest_key)
            .send()
            .await
            .map_err(|err| {
                CatalogError::Upstream(format!(
                    "failed to copy s3://{}/{} to {}: {}",
                    bucket,
                    source_key,
                    dest_key,
                    err.into_service_error()
                ))
            })?;

        info!(
            "Successfully copied s3://{}/{} to s3://{}/{}",
            bucket, source_key, bucket, dest_key
        );

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        debug!("Deleting s3://{}/{}", bucket, key);

        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                CatalogError::Upstream(format!(
                    "failed to delete s3://{}/{}: {}",
                    bucket,
                    key,
                    err.into_service_error()
                ))
            })?;

        info!("Successfully deleted s3://{}/{}", bucket, key);

        Ok(())
    }

    #[instrument(skip(self))]
    async fn presign_upload(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        debug!(
            "Presigning upload URL for s3://{}/{} (expires in: {:?})",
            bucket, key, expires_in
        );

        let presigning_config = PresigningConfig::expires_in(expires_in).map_err(|err| {
            CatalogError::Upstream(format!("failed to create presigning config: {}", err))
        })?;

        let presigned_request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type("text/csv")
            .presigned(presigning_config)
            .await
            .map_err(|err| {
                CatalogError::Upstream(format!(
                    "failed to presign upload for s3://{}/{}: {}",
                    bucket,
                    key,
                    err.into_service_error()
                ))
            })?;

        Ok(presigned_request.uri().to_string())
    }
}
