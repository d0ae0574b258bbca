//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Object storage configuration.
///
/// `kind` selects the backend: `s3` (MinIO, LocalStack, AWS), `azure_blob`,
/// or `local` for a filesystem root during development.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage backend: "s3", "azure_blob", or "local".
    #[serde(default = "default_storage_kind")]
    pub kind: String,
    /// Endpoint URL (S3-compatible backends).
    #[serde(default)]
    pub endpoint: String,
    /// Bucket or container name.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Access key id (S3) or account name (Azure).
    #[serde(default)]
    pub access_key_id: String,
    /// Secret access key (S3) or account key (Azure).
    #[serde(default)]
    pub secret_access_key: String,
    /// Region (S3).
    #[serde(default = "default_region")]
    pub region: String,
    /// Filesystem root for the "local" backend.
    #[serde(default = "default_local_root")]
    pub local_root: String,
    /// Maximum accepted photo size in bytes.
    #[serde(default = "default_max_photo_size")]
    pub max_photo_size: u64,
}

fn default_storage_kind() -> String {
    "local".to_string()
}

fn default_bucket() -> String {
    "fitbase".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_local_root() -> String {
    "./storage".to_string()
}

fn default_max_photo_size() -> u64 {
    5 * 1024 * 1024
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            kind: default_storage_kind(),
            endpoint: String::new(),
            bucket: default_bucket(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: default_region(),
            local_root: default_local_root(),
            max_photo_size: default_max_photo_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FITBASE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
