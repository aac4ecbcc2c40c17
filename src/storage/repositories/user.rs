//! User repository for account lifecycle management.

use crate::auth::user::{NewUser, User, UserStatus};
use crate::domain::{Role, UserId};
use crate::errors::{AtriumError, Result};
use crate::storage::{is_unique_violation, DbPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::instrument;

// Database row structure

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AtriumError;

    fn try_from(row: UserRow) -> Result<Self> {
        let role = Role::from_str(&row.role)
            .map_err(|e| AtriumError::validation(format!("Invalid role '{}': {}", row.role, e)))?;
        let status = UserStatus::from_str(&row.status).map_err(|e| {
            AtriumError::validation(format!("Invalid user status '{}': {}", row.status, e))
        })?;

        Ok(User {
            id: UserId::from_string(row.id),
            email: row.email,
            name: row.name,
            role,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// Repository trait

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user account. Fails with a conflict on duplicate email.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get a user by ID
    async fn find_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Get a user by normalized email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// List all users ordered by creation time
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Update a user's account status
    async fn set_user_status(&self, id: &UserId, status: UserStatus) -> Result<User>;
}

// SQLx implementation

#[derive(Debug, Clone)]
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id), name = "db_create_user")]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, email, name, role, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AtriumError::conflict(
                    format!("A user with email '{}' already exists", user.email),
                    "user",
                )
            } else {
                AtriumError::database(e, "Failed to create user")
            }
        })?;

        row.try_into()
    }

    #[instrument(skip(self), fields(user_id = %id), name = "db_find_user")]
    async fn find_user(&self, id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AtriumError::database(e, format!("Failed to fetch user by ID: {}", id)))?;

        row.map(|r| r.try_into()).transpose()
    }

    #[instrument(skip(self), name = "db_find_user_by_email")]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AtriumError::database(e, "Failed to fetch user by email"))?;

        row.map(|r| r.try_into()).transpose()
    }

    #[instrument(skip(self), name = "db_list_users")]
    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AtriumError::database(e, "Failed to list users"))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    #[instrument(skip(self), fields(user_id = %id, status = %status), name = "db_set_user_status")]
    async fn set_user_status(&self, id: &UserId, status: UserStatus) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id.as_str())
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AtriumError::database(e, format!("Failed to update user status: {}", id)))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AtriumError::not_found("User", id.as_str())),
        }
    }
}
