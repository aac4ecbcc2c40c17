//! OpenAPI document for the REST surface.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[allow(unused_imports)]
use crate::api::handlers::health::HealthResponse;
#[allow(unused_imports)]
use crate::api::handlers::users::ListUsersResponse;
#[allow(unused_imports)]
use crate::api::handlers::workspace_types::ListWorkspaceTypesResponse;
#[allow(unused_imports)]
use crate::auth::user::User;
#[allow(unused_imports)]
use crate::domain::WorkspaceType;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::workspace_types::create_workspace_type_handler,
        crate::api::handlers::workspace_types::list_workspace_types_handler,
        crate::api::handlers::workspace_types::get_workspace_type_handler,
        crate::api::handlers::workspace_types::delete_workspace_type_handler,
        crate::api::handlers::users::create_user_handler,
        crate::api::handlers::users::list_users_handler,
        crate::api::handlers::users::deactivate_user_handler,
    ),
    components(schemas(
        HealthResponse,
        WorkspaceType,
        ListWorkspaceTypesResponse,
        User,
        ListUsersResponse,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "workspace-types", description = "Workspace type management"),
        (name = "users", description = "User administration"),
    ),
    info(
        title = "Atrium API",
        description = "Multi-tenant workspace platform control plane"
    )
)]
struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Router serving the OpenAPI document.
pub fn docs_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}
