//! Request gateway for mutating resource operations.
//!
//! Every gated endpoint runs the same strictly ordered pipeline:
//!
//! 1. session resolution (axum middleware, see [`crate::auth::middleware`]),
//! 2. account state — an inactive account is rejected before any role check,
//!    so an inactive admin classifies as unauthorized rather than forbidden,
//! 3. authorization policy — anonymous access to a protected operation is a
//!    server defect (the route was reachable without its authentication
//!    layer) and classifies more severely than a role mismatch,
//! 4. closed-schema payload validation,
//! 5. persistence through the owning service.
//!
//! The first failing stage terminates the pipeline; later stages never run.
//! Failures carry a kind from the closed [`GatewayError`] taxonomy whose
//! HTTP mapping is fixed and identical for every resource kind.

use serde_json::Value;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::auth::models::AuthError;
use crate::auth::policy::{self, PolicyError};
use crate::auth::user::User;
use crate::domain::{
    Action, AuthenticatedUser, OperationDescriptor, Principal, ResourceKind, Role, UserId,
    WorkspaceType, WorkspaceTypeId,
};
use crate::errors::AtriumError;
use crate::observability::metrics;
use crate::services::{UserService, WorkspaceTypeService};
use crate::validation::{
    CreateUserRequest, CreateWorkspaceTypeRequest, RawPayload, USER_CREATE_SCHEMA,
    WORKSPACE_TYPE_CREATE_SCHEMA,
};

/// Closed classification of pipeline failures.
///
/// `Persistence` is the escape hatch for storage faults; everything else is
/// part of the externally visible contract.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Presented credentials failed to resolve.
    #[error(transparent)]
    Authentication(#[from] AuthError),
    /// Authenticated account is inactive.
    #[error("unauthorized: account {user_id} is inactive")]
    InactiveAccount { user_id: UserId },
    /// Anonymous caller reached a protected operation.
    #[error("anonymous access to protected operation {operation}")]
    AnonymousAccess { operation: OperationDescriptor },
    /// Caller's role does not permit the operation.
    #[error("forbidden: role {role} may not perform {operation}")]
    Forbidden { role: Role, operation: OperationDescriptor },
    /// Payload failed schema validation.
    #[error("invalid payload: {0}")]
    Validation(String),
    /// Resource identifier already taken.
    #[error("{0}")]
    Conflict(String),
    /// Storage-layer failure outside the closed taxonomy.
    #[error(transparent)]
    Persistence(AtriumError),
}

impl GatewayError {
    /// Stable outcome label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::Authentication(_) => "authentication",
            GatewayError::InactiveAccount { .. } => "inactive_account",
            GatewayError::AnonymousAccess { .. } => "anonymous_access",
            GatewayError::Forbidden { .. } => "forbidden",
            GatewayError::Validation(_) => "invalid_payload",
            GatewayError::Conflict(_) => "conflict",
            GatewayError::Persistence(_) => "error",
        }
    }
}

impl From<PolicyError> for GatewayError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::AnonymousAccess { operation } => {
                GatewayError::AnonymousAccess { operation }
            }
            PolicyError::RoleDenied { role, operation } => {
                GatewayError::Forbidden { role, operation }
            }
        }
    }
}

/// Map service/extraction errors into the taxonomy.
fn storage_error(err: AtriumError) -> GatewayError {
    match err {
        AtriumError::Conflict { message, .. } => GatewayError::Conflict(message),
        AtriumError::Validation { message, .. } => GatewayError::Validation(message),
        other => GatewayError::Persistence(other),
    }
}

/// Stages 2 and 3: account state, then authorization policy.
///
/// Returns the cleared caller; anonymous principals and inactive accounts
/// never get past this point.
fn clear(
    principal: &Principal,
    operation: OperationDescriptor,
) -> Result<AuthenticatedUser, GatewayError> {
    if let Some(user) = principal.as_authenticated() {
        if !user.active {
            return Err(GatewayError::InactiveAccount { user_id: user.user_id.clone() });
        }
    }

    policy::authorize(principal, operation)?;

    principal
        .as_authenticated()
        .cloned()
        .ok_or(GatewayError::AnonymousAccess { operation })
}

/// Stage 4 entry: the transport hands over an arbitrary JSON value; only an
/// object can be a payload.
fn as_payload(body: &Value) -> Result<&RawPayload, GatewayError> {
    body.as_object()
        .ok_or_else(|| GatewayError::Validation("request body must be a JSON object".to_string()))
}

fn record_outcome<T>(operation: OperationDescriptor, result: &Result<T, GatewayError>) {
    let outcome = match result {
        Ok(_) => "allowed",
        Err(err) => err.outcome(),
    };
    metrics::record_gateway_decision(
        operation.resource.as_str(),
        operation.action.as_str(),
        outcome,
    );
    if let Err(err) = result {
        warn!(operation = %operation, outcome, error = %err, "gateway rejected request");
    }
}

/// Orchestrates the pipeline for every gated endpoint.
#[derive(Clone)]
pub struct Gateway {
    workspace_types: WorkspaceTypeService,
    users: UserService,
}

impl Gateway {
    pub fn new(workspace_types: WorkspaceTypeService, users: UserService) -> Self {
        Self { workspace_types, users }
    }

    #[instrument(skip(self, principal, body))]
    pub async fn create_workspace_type(
        &self,
        principal: &Principal,
        body: &Value,
    ) -> Result<WorkspaceType, GatewayError> {
        let operation = OperationDescriptor::new(ResourceKind::WorkspaceTypes, Action::Create);
        let result = async {
            let actor = clear(principal, operation)?;
            let fields = WORKSPACE_TYPE_CREATE_SCHEMA
                .validate(as_payload(body)?)
                .map_err(|violation| GatewayError::Validation(violation.to_string()))?;
            let request = CreateWorkspaceTypeRequest::from_valid(&fields).map_err(storage_error)?;
            self.workspace_types.create(request, &actor.user_id).await.map_err(storage_error)
        }
        .await;
        record_outcome(operation, &result);
        result
    }

    #[instrument(skip(self, principal))]
    pub async fn get_workspace_type(
        &self,
        principal: &Principal,
        id: &WorkspaceTypeId,
    ) -> Result<WorkspaceType, GatewayError> {
        let operation = OperationDescriptor::new(ResourceKind::WorkspaceTypes, Action::Read);
        let result = async {
            clear(principal, operation)?;
            self.workspace_types.get(id).await.map_err(storage_error)
        }
        .await;
        record_outcome(operation, &result);
        result
    }

    #[instrument(skip(self, principal))]
    pub async fn list_workspace_types(
        &self,
        principal: &Principal,
    ) -> Result<Vec<WorkspaceType>, GatewayError> {
        let operation = OperationDescriptor::new(ResourceKind::WorkspaceTypes, Action::Read);
        let result = async {
            clear(principal, operation)?;
            self.workspace_types.list().await.map_err(storage_error)
        }
        .await;
        record_outcome(operation, &result);
        result
    }

    #[instrument(skip(self, principal))]
    pub async fn delete_workspace_type(
        &self,
        principal: &Principal,
        id: &WorkspaceTypeId,
    ) -> Result<(), GatewayError> {
        let operation = OperationDescriptor::new(ResourceKind::WorkspaceTypes, Action::Delete);
        let result = async {
            clear(principal, operation)?;
            self.workspace_types.delete(id).await.map_err(storage_error)
        }
        .await;
        record_outcome(operation, &result);
        result
    }

    #[instrument(skip(self, principal, body))]
    pub async fn create_user(
        &self,
        principal: &Principal,
        body: &Value,
    ) -> Result<User, GatewayError> {
        let operation = OperationDescriptor::new(ResourceKind::Users, Action::Create);
        let result = async {
            clear(principal, operation)?;
            let fields = USER_CREATE_SCHEMA
                .validate(as_payload(body)?)
                .map_err(|violation| GatewayError::Validation(violation.to_string()))?;
            let request = CreateUserRequest::from_valid(&fields).map_err(storage_error)?;
            self.users.create_user(request).await.map_err(storage_error)
        }
        .await;
        record_outcome(operation, &result);
        result
    }

    #[instrument(skip(self, principal))]
    pub async fn deactivate_user(
        &self,
        principal: &Principal,
        id: &UserId,
    ) -> Result<User, GatewayError> {
        let operation = OperationDescriptor::new(ResourceKind::Users, Action::Update);
        let result = async {
            clear(principal, operation)?;
            self.users.deactivate_user(id).await.map_err(storage_error)
        }
        .await;
        record_outcome(operation, &result);
        result
    }

    #[instrument(skip(self, principal))]
    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<User>, GatewayError> {
        let operation = OperationDescriptor::new(ResourceKind::Users, Action::Read);
        let result = async {
            clear(principal, operation)?;
            self.users.list_users().await.map_err(storage_error)
        }
        .await;
        record_outcome(operation, &result);
        result
    }
}
