//! # sharedrop-database
//!
//! The durable-store contract ([`CollabStore`]) consumed by the action
//! handlers, with a SQLite implementation built on sqlx repositories and a
//! process-local implementation for tests and ephemeral deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod sqlite;
pub mod store;

use std::sync::Arc;

use sharedrop_core::config::{DatabaseBackend, DatabaseConfig};
use sharedrop_core::result::AppResult;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::CollabStore;

/// Open the store selected by configuration, running migrations for SQLite.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn CollabStore>> {
    match config.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        DatabaseBackend::Sqlite => {
            let pool = DatabasePool::connect(config).await?;
            migration::run_migrations(pool.pool()).await?;
            Ok(Arc::new(SqliteStore::new(pool.into_pool())))
        }
    }
}
