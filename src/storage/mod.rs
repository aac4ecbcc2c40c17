//! # Storage and Persistence
//!
//! Database connectivity and persistence layer for the Atrium control plane.

pub mod pool;
pub mod repositories;

pub use crate::config::DatabaseConfig;
pub use pool::{create_pool, DbPool};
pub use repositories::{
    SessionRepository, SqlxSessionRepository, SqlxUserRepository, SqlxWorkspaceTypeRepository,
    UserRepository, WorkspaceTypeRepository,
};

use crate::errors::{AtriumError, Result};

/// Run database migrations embedded at compile time.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AtriumError::config_with_source("Failed to run migrations", Box::new(e)))?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Whether a sqlx error is a SQLite uniqueness-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "2067" || code.as_ref().starts_with("SQLITE_CONSTRAINT");
        }
    }
    false
}
