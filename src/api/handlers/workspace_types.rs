//! Workspace type endpoints.
//!
//! Handlers are thin: they adapt HTTP to the gateway, which owns the whole
//! decision sequence. The principal extension is installed by the session
//! middleware before any handler runs.

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
    domain::{Principal, WorkspaceType, WorkspaceTypeId},
};

/// Response for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkspaceTypesResponse {
    pub workspace_types: Vec<WorkspaceType>,
}

/// Create a workspace type
#[utoipa::path(
    post,
    path = "/api/v1/workspace-types",
    request_body = Object,
    responses(
        (status = 201, description = "Workspace type created", body = WorkspaceType),
        (status = 400, description = "Payload failed schema validation"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Identifier already taken"),
        (status = 500, description = "Route reached without authentication middleware")
    ),
    tag = "workspace-types"
)]
#[instrument(skip(state, principal, body))]
pub async fn create_workspace_type_handler(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<WorkspaceType>), ApiError> {
    let created = state.gateway.create_workspace_type(&principal, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List workspace types
#[utoipa::path(
    get,
    path = "/api/v1/workspace-types",
    responses(
        (status = 200, description = "All workspace types", body = ListWorkspaceTypesResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "workspace-types"
)]
#[instrument(skip(state, principal))]
pub async fn list_workspace_types_handler(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ListWorkspaceTypesResponse>, ApiError> {
    let workspace_types = state.gateway.list_workspace_types(&principal).await?;
    Ok(Json(ListWorkspaceTypesResponse { workspace_types }))
}

/// Get a workspace type by ID
#[utoipa::path(
    get,
    path = "/api/v1/workspace-types/{id}",
    params(("id" = String, Path, description = "Workspace type identifier")),
    responses(
        (status = 200, description = "The workspace type", body = WorkspaceType),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such workspace type")
    ),
    tag = "workspace-types"
)]
#[instrument(skip(state, principal))]
pub async fn get_workspace_type_handler(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<WorkspaceType>, ApiError> {
    let id = WorkspaceTypeId::parse(&id).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let workspace_type = state.gateway.get_workspace_type(&principal, &id).await?;
    Ok(Json(workspace_type))
}

/// Delete a workspace type
#[utoipa::path(
    delete,
    path = "/api/v1/workspace-types/{id}",
    params(("id" = String, Path, description = "Workspace type identifier")),
    responses(
        (status = 204, description = "Workspace type deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such workspace type")
    ),
    tag = "workspace-types"
)]
#[instrument(skip(state, principal))]
pub async fn delete_workspace_type_handler(
    State(state): State<ApiState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = WorkspaceTypeId::parse(&id).map_err(|e| ApiError::bad_request(e.to_string()))?;
    state.gateway.delete_workspace_type(&principal, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
