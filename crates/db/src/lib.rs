//! Postgres connectivity for libris: pool construction, module migrations
//! and classification of driver errors.

mod error;
mod migrate;

pub use error::{classify, DbError};
pub use migrate::{apply_migrations, MIGRATIONS_TABLE};

use std::time::Duration;

use anyhow::Context;
use libris_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Open the connection pool described by `settings`.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    tracing::info!(
        target: "libris-db",
        max_connections = settings.max_connections,
        "connecting to postgres"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
        .connect(&settings.url)
        .await
        .context("failed to connect to postgres")
}

/// Round-trip a trivial query.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(classify)
}
