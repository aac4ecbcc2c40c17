//! Router assembly.
//!
//! Every resource route is wrapped by the session middleware; handlers then
//! run the gateway pipeline. Only `/health` and the OpenAPI document are
//! reachable without passing through session resolution.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::middleware::resolve_principal;
use crate::auth::session::SessionResolver;
use crate::gateway::Gateway;
use crate::services::{UserService, WorkspaceTypeService};
use crate::storage::repositories::{
    SqlxSessionRepository, SqlxUserRepository, SqlxWorkspaceTypeRepository,
};
use crate::storage::DbPool;

use super::{
    docs,
    handlers::{
        create_user_handler, create_workspace_type_handler, delete_workspace_type_handler,
        deactivate_user_handler, get_workspace_type_handler, health_handler, list_users_handler,
        list_workspace_types_handler,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub gateway: Gateway,
}

/// Build the application router on top of a connection pool.
pub fn build_router(pool: DbPool) -> Router {
    let user_repository = Arc::new(SqlxUserRepository::new(pool.clone()));
    let session_repository = Arc::new(SqlxSessionRepository::new(pool.clone()));
    let workspace_type_repository = Arc::new(SqlxWorkspaceTypeRepository::new(pool));

    let resolver =
        Arc::new(SessionResolver::new(session_repository, user_repository.clone()));
    let gateway = Gateway::new(
        WorkspaceTypeService::new(workspace_type_repository),
        UserService::new(user_repository),
    );

    let api_state = ApiState { gateway };

    let gated = Router::new()
        .route(
            "/api/v1/workspace-types",
            post(create_workspace_type_handler).get(list_workspace_types_handler),
        )
        .route(
            "/api/v1/workspace-types/{id}",
            get(get_workspace_type_handler).delete(delete_workspace_type_handler),
        )
        .route("/api/v1/users", post(create_user_handler).get(list_users_handler))
        .route("/api/v1/users/{id}/deactivate", put(deactivate_user_handler))
        .layer(middleware::from_fn_with_state(resolver, resolve_principal))
        .with_state(api_state);

    Router::new()
        .route("/health", get(health_handler))
        .merge(docs::docs_router())
        .merge(gated)
        .layer(TraceLayer::new_for_http())
}
