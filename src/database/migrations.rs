//! Versioned schema migrations recorded in `schema_version`

use sqlx::{Executor, PgPool};
use tracing::{debug, info, warn};

use super::manager::DatabaseError;
use super::schema::{CASCADE_USERS_ON_JOB_DELETE, INITIAL_SCHEMA};

pub struct Migration {
    pub version: i32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Append new migrations here; versions must increase by one
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: INITIAL_SCHEMA,
    },
    Migration {
        version: 2,
        name: "cascade_users_on_job_delete",
        sql: CASCADE_USERS_ON_JOB_DELETE,
    },
];

pub fn latest_version() -> i32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Apply every pending migration, returning how many ran
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DatabaseError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current = current_version(pool).await?;
    let latest = latest_version();

    if current > latest {
        warn!(
            "Database schema version {} is newer than application version {}",
            current, latest
        );
        return Ok(0);
    }

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        apply(pool, migration).await?;
        applied += 1;
    }

    if applied == 0 {
        debug!("Database schema is up to date (v{})", current);
    }
    Ok(applied)
}

pub async fn current_version(pool: &PgPool) -> Result<i32, DatabaseError> {
    let version: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

async fn apply(pool: &PgPool, migration: &Migration) -> Result<(), DatabaseError> {
    let failed = |e: sqlx::Error| {
        DatabaseError::MigrationError(format!(
            "v{} ({}): {}",
            migration.version, migration.name, e
        ))
    };

    let start = std::time::Instant::now();
    let mut tx = pool.begin().await.map_err(failed)?;

    // Plain &str goes over the simple query protocol, which allows several statements
    (&mut *tx).execute(migration.sql).await.map_err(failed)?;

    sqlx::query("INSERT INTO schema_version (version, name) VALUES ($1, $2)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await
        .map_err(failed)?;

    tx.commit().await.map_err(failed)?;

    info!(
        "Applied migration v{} ({}) in {:?}",
        migration.version,
        migration.name,
        start.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_contiguous() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version, index as i32 + 1);
        }
        assert_eq!(latest_version(), MIGRATIONS.len() as i32);
    }
}
