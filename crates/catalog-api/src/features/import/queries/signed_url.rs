use catalog_common::CatalogError;
use catalog_import::keys;
use catalog_import::storage::ObjectStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlQuery {
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlResponse {
    pub url: String,
    pub expires_in: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum SignedUrlError {
    #[error("Missing 'name' query parameter")]
    NameRequired,
    #[error("Storage error: {0}")]
    Storage(#[from] CatalogError),
}

impl SignedUrlQuery {
    pub fn validate(&self) -> Result<(), SignedUrlError> {
        if self.file_name.trim().is_empty() {
            return Err(SignedUrlError::NameRequired);
        }
        Ok(())
    }
}

/// Issue a time-boxed write credential for `uploaded/<file_name>`.
///
/// No object is created here; the caller writes directly to the store with
/// the returned URL.
#[tracing::instrument(skip(store))]
pub async fn handle(
    store: &dyn ObjectStore,
    bucket: &str,
    url_ttl_secs: u64,
    query: SignedUrlQuery,
) -> Result<SignedUrlResponse, SignedUrlError> {
    query.validate()?;

    let key = keys::staged_key(&query.file_name);

    let url = store
        .presign_upload(bucket, &key, Duration::from_secs(url_ttl_secs))
        .await?;

    Ok(SignedUrlResponse {
        url,
        expires_in: url_ttl_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_success() {
        let query = SignedUrlQuery {
            file_name: "products.csv".to_string(),
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_name() {
        let query = SignedUrlQuery {
            file_name: "".to_string(),
        };
        assert!(matches!(query.validate(), Err(SignedUrlError::NameRequired)));
    }

    #[test]
    fn test_validation_whitespace_name() {
        let query = SignedUrlQuery {
            file_name: "   ".to_string(),
        };
        assert!(matches!(query.validate(), Err(SignedUrlError::NameRequired)));
    }
}
