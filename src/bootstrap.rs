//! Process lifecycle: every long-lived dependency is built here and passed
//! down explicitly, then torn down in reverse on shutdown.

use std::sync::Arc;

use anyhow::Context;
use libris_cache::CacheClient;
use libris_kernel::{InitCtx, ModuleRegistry, Settings};
use sqlx::PgPool;

use crate::health;
use crate::modules::{
    self,
    books::{BookCatalog, PgBookRepository},
};

/// Build the module registry around an existing pool and cache client
pub fn build_registry(pool: PgPool, cache: CacheClient) -> ModuleRegistry {
    let catalog = Arc::new(BookCatalog::new(
        Arc::new(PgBookRepository::new(pool)),
        cache,
    ));

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, catalog);
    registry
}

/// Apply every pending module migration
pub async fn migrate(pool: &PgPool, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    libris_db::apply_migrations(pool, &migrations)
        .await
        .context("failed to apply migrations")
}

/// Connect to the database only long enough to run migrations
pub async fn migrate_only(settings: &Settings) -> anyhow::Result<usize> {
    let pool = libris_db::connect(&settings.database).await?;
    let registry = build_registry(pool.clone(), CacheClient::disabled());
    let applied = migrate(&pool, &registry).await;
    pool.close().await;
    applied
}

/// Run the service until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        service = %settings.app_name,
        "libris bootstrap starting"
    );

    let pool = libris_db::connect(&settings.database).await?;
    libris_db::health_check(&pool)
        .await
        .context("database did not answer a health check")?;
    let cache = CacheClient::connect(&settings.cache).await;
    tracing::info!(
        cache_available = cache.is_available(),
        cache_backend = cache.backend().unwrap_or("none"),
        "cache client ready"
    );

    let registry = build_registry(pool.clone(), cache.clone());
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    if settings.database.run_migrations {
        migrate(&pool, &registry).await?;
    }
    registry.start_modules(&ctx).await?;

    let app = libris_http::build_router(
        &registry,
        &settings,
        health::routes(settings.app_name.clone(), cache),
    );
    tracing::info!("libris bootstrap complete");

    let served = libris_http::serve(app, &settings).await;

    let stopped = registry.stop_modules().await;
    pool.close().await;
    tracing::info!("libris shut down");

    served?;
    stopped
}
