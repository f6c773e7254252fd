use libris_kernel::Migration;
use sqlx::PgPool;

use crate::error::{classify, DbError};

/// Ledger of applied module migrations.
pub const MIGRATIONS_TABLE: &str = "libris_migrations";

/// Apply every migration not yet recorded in the ledger.
///
/// `migrations` should already be in execution order (see
/// `ModuleRegistry::collect_migrations`). Each migration runs in its own
/// transaction together with its ledger row. Returns how many were applied.
pub async fn apply_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> Result<usize, DbError> {
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
            module TEXT NOT NULL,
            id TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (module, id)
        )"
    ))
    .execute(pool)
    .await
    .map_err(classify)?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let already: Option<(String,)> = sqlx::query_as(&format!(
            "SELECT id FROM {MIGRATIONS_TABLE} WHERE module = $1 AND id = $2"
        ))
        .bind(module)
        .bind(migration.id)
        .fetch_optional(pool)
        .await
        .map_err(classify)?;

        if already.is_some() {
            tracing::debug!(target: "libris-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        tracing::info!(target: "libris-db", %module, id = migration.id, "applying migration");

        let mut tx = pool.begin().await.map_err(classify)?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        sqlx::query(&format!(
            "INSERT INTO {MIGRATIONS_TABLE} (module, id) VALUES ($1, $2)"
        ))
        .bind(module)
        .bind(migration.id)
        .execute(&mut *tx)
        .await
        .map_err(classify)?;
        tx.commit().await.map_err(classify)?;

        applied += 1;
    }

    tracing::info!(target: "libris-db", applied, total = migrations.len(), "migrations complete");
    Ok(applied)
}
