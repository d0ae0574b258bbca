//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: MinIO, LocalStack, AWS S3, Cloudflare R2
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create S3-compatible provider (MinIO, LocalStack, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
        }
    }

    /// Compose the public URL a blob under `key` is reachable at.
    ///
    /// The URL is stored on the account record next to the key itself;
    /// nothing ever parses a key back out of it.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        match self {
            Self::S3 {
                endpoint, bucket, ..
            } => format!("{endpoint}/{bucket}/{key}"),
            Self::AzureBlob {
                account, container, ..
            } => format!("https://{account}.blob.core.windows.net/{container}/{key}"),
            Self::LocalFs { root } => format!("{}/{key}", root.display()),
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum photo size in bytes.
    pub max_photo_size: u64,
}

impl StorageConfig {
    /// Default max photo size: 5MB.
    pub const DEFAULT_MAX_PHOTO_SIZE: u64 = 5 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_photo_size: Self::DEFAULT_MAX_PHOTO_SIZE,
        }
    }

    /// Set maximum photo size.
    #[must_use]
    pub fn with_max_photo_size(mut self, size: u64) -> Self {
        self.max_photo_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_provider_s3() {
        let provider = StorageProvider::s3(
            "http://localhost:4566",
            "photos",
            "access_key",
            "secret_key",
            "us-east-1",
        );
        assert_eq!(provider.name(), "s3");
        assert_eq!(provider.bucket(), "photos");
    }

    #[test]
    fn test_storage_provider_azure() {
        let provider = StorageProvider::azure_blob("fitbasedev", "access_key", "photos");
        assert_eq!(provider.name(), "azure_blob");
        assert_eq!(provider.bucket(), "photos");
    }

    #[test]
    fn test_storage_provider_local() {
        let provider = StorageProvider::local_fs("./storage");
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_public_url_s3() {
        let provider = StorageProvider::s3("http://localhost:4566", "photos", "k", "s", "r");
        assert_eq!(
            provider.public_url("user/abc"),
            "http://localhost:4566/photos/user/abc"
        );
    }

    #[test]
    fn test_public_url_azure() {
        let provider = StorageProvider::azure_blob("fitbasedev", "key", "photos");
        assert_eq!(
            provider.public_url("coach/abc"),
            "https://fitbasedev.blob.core.windows.net/photos/coach/abc"
        );
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.max_photo_size, StorageConfig::DEFAULT_MAX_PHOTO_SIZE);
    }
}
