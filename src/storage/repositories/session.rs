//! Session repository backing the session resolver.

use crate::auth::models::{NewSession, Session};
use crate::domain::{SessionId, UserId};
use crate::errors::{AtriumError, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

// Database row structure

#[derive(Debug, Clone, FromRow)]
struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: SessionId::from_string(row.id),
            user_id: UserId::from_string(row.user_id),
            secret_hash: row.secret_hash,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

// Repository trait

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a newly minted session
    async fn insert_session(&self, session: NewSession) -> Result<Session>;

    /// Get a session by ID
    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Delete sessions that expired before `now`. Returns the number removed.
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64>;
}

// SQLx implementation

#[derive(Debug, Clone)]
pub struct SqlxSessionRepository {
    pool: DbPool,
}

impl SqlxSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id), name = "db_insert_session")]
    async fn insert_session(&self, session: NewSession) -> Result<Session> {
        let row = sqlx::query_as::<_, SessionRow>(
            "INSERT INTO sessions (id, user_id, secret_hash, created_at, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(session.id.as_str())
        .bind(session.user_id.as_str())
        .bind(&session.secret_hash)
        .bind(Utc::now())
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AtriumError::database(e, "Failed to insert session"))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(session_id = %id), name = "db_find_session")]
    async fn find_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AtriumError::database(e, format!("Failed to fetch session by ID: {}", id))
            })?;

        Ok(row.map(Session::from))
    }

    #[instrument(skip(self), name = "db_delete_expired_sessions")]
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| AtriumError::database(e, "Failed to delete expired sessions"))?;

        Ok(result.rows_affected())
    }
}
