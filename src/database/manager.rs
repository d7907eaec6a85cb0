use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::memory::MemoryStore;
use super::migrations;
use super::postgres::PgStore;
use super::schema::{foreign_key_violation_message, unique_violation_message};
use super::store::Store;
use crate::config::DatabaseConfig;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Migration failed: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().unwrap_or_default();
            match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return DatabaseError::Conflict(unique_violation_message(constraint))
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return DatabaseError::Conflict(foreign_key_violation_message(constraint))
                }
                _ => {}
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Which adapter a `DATABASE_URL` selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Memory,
}

impl Backend {
    pub fn from_url(database_url: &str) -> Result<Self, DatabaseError> {
        if database_url.trim().is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }
        let url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "memory" => Ok(Backend::Memory),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }
}

/// Owns the PostgreSQL connection pool
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!(
            "Created database pool for: {} (max {} connections)",
            Self::redacted(&config.url),
            config.max_connections
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn migrate(&self) -> Result<usize, DatabaseError> {
        migrations::run_migrations(&self.pool).await
    }

    pub async fn close(self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Connect, migrate and wrap the adapter selected by the URL scheme
    pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        match Backend::from_url(&config.url)? {
            Backend::Memory => {
                info!("Using in-memory store; data will not survive a restart");
                Ok(Arc::new(MemoryStore::new()))
            }
            Backend::Postgres => {
                let manager = Self::connect(config).await?;
                let applied = manager.migrate().await?;
                if applied > 0 {
                    info!("Applied {} migration(s)", applied);
                }
                Ok(Arc::new(PgStore::new(manager.pool)))
            }
        }
    }

    /// URL with the password removed, for logs
    pub fn redacted(database_url: &str) -> String {
        match url::Url::parse(database_url) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}
