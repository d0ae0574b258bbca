//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{ErrorKind, Operator, services};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Byte-blob storage consumed by the account orchestrator.
///
/// `put` returns the public URL of the stored blob. Implementations provide
/// their own concurrency control; callers never retry internally.
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key`, overwriting any existing blob.
    fn put(
        &self,
        bytes: Bytes,
        key: &str,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send;

    /// Fetch the blob stored under `key`.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Bytes, StorageError>> + Send;

    /// Delete the blob stored under `key`.
    fn delete(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Check whether a blob exists under `key`.
    fn exists(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<bool, StorageError>> + Send;
}

/// Object store adapter for profile photos.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };

        Ok(operator)
    }

    /// Validate a payload against the configured size limit.
    ///
    /// # Errors
    ///
    /// Returns `PhotoTooLarge` if the payload exceeds the limit.
    pub fn validate_size(&self, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_photo_size {
            return Err(StorageError::photo_too_large(
                size,
                self.config.max_photo_size,
            ));
        }

        Ok(())
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

impl ObjectStorage for StorageService {
    async fn put(&self, bytes: Bytes, key: &str) -> Result<String, StorageError> {
        self.validate_size(bytes.len() as u64)?;

        self.operator.write(key, bytes).await?;

        Ok(self.config.provider.public_url(key))
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_bytes())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self.operator.stat(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::from(e)),
        }
    }
}
