//! Fitbase API Server
//!
//! Main entry point for the Fitbase account service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitbase_api::{AppState, create_router};
use fitbase_core::storage::{StorageConfig, StorageProvider, StorageService};
use fitbase_db::connect;
use fitbase_shared::{AppConfig, StorageSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitbase=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Initialize object storage
    let storage = StorageService::from_config(build_storage_config(&config.storage))
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {e}"))?;
    info!(provider = storage.provider_name(), "Object storage configured");

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        storage: Arc::new(storage),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Map the flat storage settings onto the provider config.
fn build_storage_config(settings: &StorageSettings) -> StorageConfig {
    let provider = match settings.kind.as_str() {
        "s3" => StorageProvider::s3(
            &settings.endpoint,
            &settings.bucket,
            &settings.access_key_id,
            &settings.secret_access_key,
            &settings.region,
        ),
        "azure_blob" => StorageProvider::azure_blob(
            &settings.access_key_id,
            &settings.secret_access_key,
            &settings.bucket,
        ),
        _ => StorageProvider::local_fs(&settings.local_root),
    };

    StorageConfig::new(provider).with_max_photo_size(settings.max_photo_size)
}
