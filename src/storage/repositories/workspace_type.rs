//! Workspace type repository.
//!
//! The identifier is caller-supplied, so uniqueness is enforced by the
//! storage layer itself: creation is a single conditional insert, never a
//! check-then-write sequence. Concurrent creators racing on the same
//! identifier serialize here and exactly one wins.

use crate::domain::{NewWorkspaceType, UserId, WorkspaceType, WorkspaceTypeId};
use crate::errors::{AtriumError, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

// Database row structure

#[derive(Debug, Clone, FromRow)]
struct WorkspaceTypeRow {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkspaceTypeRow> for WorkspaceType {
    fn from(row: WorkspaceTypeRow) -> Self {
        WorkspaceType {
            id: WorkspaceTypeId::from_trusted(row.id),
            name: row.name,
            description: row.description,
            created_by: UserId::from_string(row.created_by),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// Repository trait

#[async_trait]
pub trait WorkspaceTypeRepository: Send + Sync {
    /// Insert the workspace type if its identifier is free.
    ///
    /// Returns `None` when another row already holds the identifier; the
    /// check and the insert are one atomic statement.
    async fn create_if_absent(&self, request: NewWorkspaceType) -> Result<Option<WorkspaceType>>;

    /// Get a workspace type by ID
    async fn find_workspace_type(&self, id: &WorkspaceTypeId) -> Result<Option<WorkspaceType>>;

    /// List all workspace types ordered by creation time
    async fn list_workspace_types(&self) -> Result<Vec<WorkspaceType>>;

    /// Delete a workspace type. Returns false when no row matched.
    async fn delete_workspace_type(&self, id: &WorkspaceTypeId) -> Result<bool>;
}

// SQLx implementation

#[derive(Debug, Clone)]
pub struct SqlxWorkspaceTypeRepository {
    pool: DbPool,
}

impl SqlxWorkspaceTypeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceTypeRepository for SqlxWorkspaceTypeRepository {
    #[instrument(
        skip(self, request),
        fields(workspace_type_id = %request.id),
        name = "db_create_workspace_type"
    )]
    async fn create_if_absent(&self, request: NewWorkspaceType) -> Result<Option<WorkspaceType>> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, WorkspaceTypeRow>(
            "INSERT INTO workspace_types (id, name, description, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO NOTHING
             RETURNING *",
        )
        .bind(request.id.as_str())
        .bind(request.name.as_deref())
        .bind(request.description.as_deref())
        .bind(request.created_by.as_str())
        .bind(now)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AtriumError::database(e, "Failed to create workspace type"))?;

        Ok(row.map(WorkspaceType::from))
    }

    #[instrument(skip(self), fields(workspace_type_id = %id), name = "db_find_workspace_type")]
    async fn find_workspace_type(&self, id: &WorkspaceTypeId) -> Result<Option<WorkspaceType>> {
        let row = sqlx::query_as::<_, WorkspaceTypeRow>("SELECT * FROM workspace_types WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AtriumError::database(e, format!("Failed to fetch workspace type: {}", id))
            })?;

        Ok(row.map(WorkspaceType::from))
    }

    #[instrument(skip(self), name = "db_list_workspace_types")]
    async fn list_workspace_types(&self) -> Result<Vec<WorkspaceType>> {
        let rows = sqlx::query_as::<_, WorkspaceTypeRow>(
            "SELECT * FROM workspace_types ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AtriumError::database(e, "Failed to list workspace types"))?;

        Ok(rows.into_iter().map(WorkspaceType::from).collect())
    }

    #[instrument(skip(self), fields(workspace_type_id = %id), name = "db_delete_workspace_type")]
    async fn delete_workspace_type(&self, id: &WorkspaceTypeId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workspace_types WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AtriumError::database(e, format!("Failed to delete workspace type: {}", id))
            })?;

        Ok(result.rows_affected() > 0)
    }
}
