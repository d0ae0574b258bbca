//! Shared configuration for Fitbase.

pub mod config;

pub use config::{AppConfig, DatabaseConfig, ServerConfig, StorageSettings};
