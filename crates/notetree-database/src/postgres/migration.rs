//! Schema migrations, embedded from the workspace `migrations/` directory.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use sqlx::migrate::{Migrate, MigrateError, Migrator};
use tracing::info;

use notetree_core::error::{AppError, ErrorKind};
use notetree_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// A migration the database has not applied yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingMigration {
    pub version: i64,
    pub description: String,
}

/// Apply every pending migration and return how many ran.
pub async fn run_migrations(pool: &PgPool) -> AppResult<usize> {
    let pending = pending_migrations(pool).await?;
    if pending.is_empty() {
        info!("Schema is up to date");
        return Ok(0);
    }

    info!(pending = pending.len(), "Applying migrations");
    MIGRATOR.run(pool).await.map_err(migrate_error)?;
    Ok(pending.len())
}

/// Embedded migrations missing from the database's migration table.
pub async fn pending_migrations(pool: &PgPool) -> AppResult<Vec<PendingMigration>> {
    let mut conn = pool.acquire().await.map_err(|e| {
        AppError::with_source(ErrorKind::Gateway, "Cannot acquire a connection", e)
    })?;
    conn.ensure_migrations_table().await.map_err(migrate_error)?;
    let applied: HashSet<i64> = conn
        .list_applied_migrations()
        .await
        .map_err(migrate_error)?
        .into_iter()
        .map(|m| m.version)
        .collect();

    Ok(MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration() && !applied.contains(&m.version))
        .map(|m| PendingMigration {
            version: m.version,
            description: m.description.to_string(),
        })
        .collect())
}

fn migrate_error(err: MigrateError) -> AppError {
    AppError::with_source(ErrorKind::Gateway, format!("Migration failed: {err}"), err)
}
