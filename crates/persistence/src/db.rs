//! Database connection pool management.
//!
//! The admin tool opens a single pool against the fleet database at startup;
//! every repository clones a handle to it. Sizing comes from the
//! `[database]` configuration section and defaults to a small pool, since a
//! one-shot CLI invocation rarely needs more than a couple of connections.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::debug;

/// Connection pool settings for the fleet database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Opens the PostgreSQL connection pool for the fleet database.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "fleet database pool ready"
    );
    Ok(pool)
}
