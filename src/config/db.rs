// src/config/db.rs
// DOCUMENTATION: Storage initialization
// PURPOSE: Build the configured storage backend (in-memory or PostgreSQL pool)

use crate::config::{Config, StorageBackend};
use crate::db::{MemStorage, PgStorage, Storage};
use crate::errors::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Creates connection pool and applies embedded migrations
/// Called once during application startup when STORAGE_BACKEND=postgres
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!("Initializing database pool");

    let pool = PgPoolOptions::new()
        // Maximum concurrent connections
        .max_connections(config.db_max_connections)
        // Timeout waiting for connection from pool
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Connection idle timeout (5 minutes)
        .idle_timeout(Duration::from_secs(300))
        // Connection lifetime (30 minutes before recycle)
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    // Verify connection works
    sqlx::query("SELECT 1").execute(&pool).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    log::info!("Database pool initialized and migrations applied");
    Ok(pool)
}

/// Build the storage implementation selected by configuration
pub async fn init_storage(config: &Config) -> Result<Arc<dyn Storage>, AppError> {
    match config.storage_backend {
        StorageBackend::Memory => {
            log::info!("Using in-memory storage");
            Ok(Arc::new(MemStorage::new()))
        }
        StorageBackend::Postgres => {
            let pool = init_db_pool(config).await.map_err(|e| {
                log::error!("Failed to connect to database: {}", e);
                AppError::DatabaseError(e.to_string())
            })?;
            Ok(Arc::new(PgStorage::new(pool)))
        }
    }
}
