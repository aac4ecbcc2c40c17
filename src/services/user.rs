//! User administration service.
//!
//! Account mutation (creation, deactivation) is an administrative surface;
//! the request gateway itself only ever reads account state.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::auth::user::{NewUser, User, UserStatus};
use crate::domain::UserId;
use crate::errors::Result;
use crate::storage::repositories::UserRepository;
use crate::validation::CreateUserRequest;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Create a new active user account.
    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        let user = self
            .repository
            .create_user(NewUser {
                id: UserId::new(),
                email: User::normalize_email(&request.email),
                name: request.name,
                role: request.role,
                status: UserStatus::Active,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Mark a user inactive.
    ///
    /// Existing sessions are left in place; resolution reads account state
    /// per request, so the deactivation takes effect on the user's next call.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn deactivate_user(&self, id: &UserId) -> Result<User> {
        let user = self.repository.set_user_status(id, UserStatus::Inactive).await?;
        info!(user_id = %user.id, "user deactivated");
        Ok(user)
    }

    pub async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        self.repository.find_user(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.repository.list_users().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::storage::repositories::SqlxUserRepository;
    use crate::storage::test_helpers::memory_pool;

    fn request(email: &str, role: Role) -> CreateUserRequest {
        CreateUserRequest { email: email.to_string(), name: "Someone".to_string(), role }
    }

    #[tokio::test]
    async fn create_normalizes_email_and_activates() {
        let pool = memory_pool().await;
        let service = UserService::new(Arc::new(SqlxUserRepository::new(pool)));

        let user = service.create_user(request("  Person@Example.COM ", Role::Member)).await.unwrap();
        assert_eq!(user.email, "person@example.com");
        assert!(user.is_active());
        assert_eq!(user.role, Role::Member);
    }

    #[tokio::test]
    async fn deactivate_flips_account_state() {
        let pool = memory_pool().await;
        let service = UserService::new(Arc::new(SqlxUserRepository::new(pool)));

        let user = service.create_user(request("a@example.com", Role::Admin)).await.unwrap();
        let deactivated = service.deactivate_user(&user.id).await.unwrap();
        assert!(!deactivated.is_active());

        let fetched = service.get_user(&user.id).await.unwrap().unwrap();
        assert!(!fetched.is_active());
    }
}
