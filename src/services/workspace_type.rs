//! Workspace type service.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::{NewWorkspaceType, UserId, WorkspaceType, WorkspaceTypeId};
use crate::errors::{AtriumError, Result};
use crate::storage::repositories::WorkspaceTypeRepository;
use crate::validation::CreateWorkspaceTypeRequest;

/// Service owning workspace type persistence.
#[derive(Clone)]
pub struct WorkspaceTypeService {
    repository: Arc<dyn WorkspaceTypeRepository>,
}

impl WorkspaceTypeService {
    pub fn new(repository: Arc<dyn WorkspaceTypeRepository>) -> Self {
        Self { repository }
    }

    /// Persist a new workspace type.
    ///
    /// The uniqueness check and the insert are one atomic repository call;
    /// a taken identifier surfaces as a conflict.
    #[instrument(skip(self, request), fields(workspace_type_id = %request.id))]
    pub async fn create(
        &self,
        request: CreateWorkspaceTypeRequest,
        created_by: &UserId,
    ) -> Result<WorkspaceType> {
        let created = self
            .repository
            .create_if_absent(NewWorkspaceType {
                id: request.id.clone(),
                name: request.name,
                description: request.description,
                created_by: created_by.clone(),
            })
            .await?
            .ok_or_else(|| {
                AtriumError::conflict(
                    format!("Workspace type '{}' already exists", request.id),
                    "workspace-type",
                )
            })?;

        info!(workspace_type_id = %created.id, "workspace type created");
        Ok(created)
    }

    #[instrument(skip(self), fields(workspace_type_id = %id))]
    pub async fn get(&self, id: &WorkspaceTypeId) -> Result<WorkspaceType> {
        self.repository
            .find_workspace_type(id)
            .await?
            .ok_or_else(|| AtriumError::not_found("WorkspaceType", id.as_str()))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<WorkspaceType>> {
        self.repository.list_workspace_types().await
    }

    #[instrument(skip(self), fields(workspace_type_id = %id))]
    pub async fn delete(&self, id: &WorkspaceTypeId) -> Result<()> {
        if !self.repository.delete_workspace_type(id).await? {
            return Err(AtriumError::not_found("WorkspaceType", id.as_str()));
        }
        info!(workspace_type_id = %id, "workspace type deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::{NewUser, UserStatus};
    use crate::domain::Role;
    use crate::storage::repositories::{
        SqlxUserRepository, SqlxWorkspaceTypeRepository, UserRepository,
    };
    use crate::storage::test_helpers::memory_pool;
    use crate::storage::DbPool;

    async fn service_with_admin(pool: &DbPool) -> (WorkspaceTypeService, UserId) {
        let users = SqlxUserRepository::new(pool.clone());
        let admin = users
            .create_user(NewUser {
                id: UserId::new(),
                email: format!("{}@example.com", UserId::new()),
                name: "Admin".to_string(),
                role: Role::Admin,
                status: UserStatus::Active,
            })
            .await
            .expect("create admin");

        let service =
            WorkspaceTypeService::new(Arc::new(SqlxWorkspaceTypeRepository::new(pool.clone())));
        (service, admin.id)
    }

    fn request(id: &str) -> CreateWorkspaceTypeRequest {
        CreateWorkspaceTypeRequest {
            id: WorkspaceTypeId::parse(id).expect("valid id"),
            name: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn create_then_conflict_on_duplicate() {
        let pool = memory_pool().await;
        let (service, admin) = service_with_admin(&pool).await;

        let created = service.create(request("ml-workbench"), &admin).await.unwrap();
        assert_eq!(created.id.as_str(), "ml-workbench");
        assert_eq!(created.created_by, admin);

        let err = service.create(request("ml-workbench"), &admin).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn get_and_delete_report_missing_ids() {
        let pool = memory_pool().await;
        let (service, admin) = service_with_admin(&pool).await;

        service.create(request("present"), &admin).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);

        let missing = WorkspaceTypeId::parse("absent").unwrap();
        assert!(matches!(service.get(&missing).await.unwrap_err(), AtriumError::NotFound { .. }));
        assert!(matches!(
            service.delete(&missing).await.unwrap_err(),
            AtriumError::NotFound { .. }
        ));

        let present = WorkspaceTypeId::parse("present").unwrap();
        service.delete(&present).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }
}
