//! User administration endpoints.
//!
//! All admin-only; the same gateway pipeline gates every route here, so the
//! failure classifications match the workspace-type surface exactly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    api::{error::ApiError, routes::ApiState},
    auth::user::User,
    domain::{Principal, UserId},
};

/// Response for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = Object,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Payload failed schema validation"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
#[instrument(skip(state, principal, body))]
pub async fn create_user_handler(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.gateway.create_user(&principal, &body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List user accounts
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = ListUsersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "users"
)]
#[instrument(skip(state, principal))]
pub async fn list_users_handler(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let users = state.gateway.list_users(&principal).await?;
    Ok(Json(ListUsersResponse { users }))
}

/// Deactivate a user account
///
/// Deactivation is read by session resolution on the user's next request;
/// their existing sessions stop clearing the gateway from that point on.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/deactivate",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deactivated", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such user")
    ),
    tag = "users"
)]
#[instrument(skip(state, principal))]
pub async fn deactivate_user_handler(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = UserId::parse(&id)
        .map_err(|_| ApiError::bad_request("user id must be a UUID".to_string()))?;
    let user = state.gateway.deactivate_user(&principal, &id).await?;
    Ok(Json(user))
}
