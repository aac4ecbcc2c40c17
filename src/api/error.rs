//! HTTP error responses.
//!
//! Every failure is rendered as a `{ error, message }` JSON body. The
//! mapping from pipeline failure kinds to status codes is fixed and does not
//! vary by resource kind. `BadImplementation` is deliberately distinct from
//! `Forbidden`: it marks a protected operation reached without any
//! authentication, i.e. a route wired up without its middleware, so
//! operators can tell "wrong user" apart from "route incorrectly exposed".

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::auth::models::AuthError;
use crate::errors::AtriumError;
use crate::gateway::GatewayError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    BadImplementation(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadImplementation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn service_unavailable<S: Into<String>>(msg: S) -> Self {
        ApiError::ServiceUnavailable(msg.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error_kind = match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::BadImplementation(_) => "bad_implementation",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::Internal(_) => "internal_error",
        };

        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadImplementation(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => msg,
        };

        (status, Json(ErrorBody { error: error_kind, message })).into_response()
    }
}

impl From<AtriumError> for ApiError {
    fn from(err: AtriumError) -> Self {
        match err {
            AtriumError::Validation { message, .. } => ApiError::BadRequest(message),
            AtriumError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} '{}' not found", resource_type, id))
            }
            AtriumError::Conflict { message, .. } => ApiError::Conflict(message),
            AtriumError::Database { context, .. } => ApiError::Internal(context),
            AtriumError::Config { message, .. } | AtriumError::Internal { message, .. } => {
                ApiError::Internal(message)
            }
            AtriumError::Io { context, .. } | AtriumError::Serialization { context, .. } => {
                ApiError::Internal(context)
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MalformedToken => {
                ApiError::Unauthorized("Unauthorized: malformed session token".to_string())
            }
            AuthError::SessionNotFound => {
                ApiError::Unauthorized("Unauthorized: session not found".to_string())
            }
            AuthError::SessionExpired => {
                ApiError::Unauthorized("Unauthorized: session has expired".to_string())
            }
            AuthError::Persistence(err) => {
                ApiError::ServiceUnavailable(format!("Session store unavailable: {}", err))
            }
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Authentication(inner) => ApiError::from(inner),
            GatewayError::InactiveAccount { .. } => {
                ApiError::Unauthorized("Unauthorized: account is inactive".to_string())
            }
            GatewayError::AnonymousAccess { operation } => ApiError::BadImplementation(format!(
                "Protected operation {} reached without authentication",
                operation
            )),
            GatewayError::Forbidden { .. } => {
                ApiError::Forbidden("Forbidden: insufficient permissions".to_string())
            }
            GatewayError::Validation(message) => ApiError::BadRequest(message),
            GatewayError::Conflict(message) => ApiError::Conflict(message),
            GatewayError::Persistence(inner) => ApiError::from(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, OperationDescriptor, ResourceKind, Role, UserId};

    fn status_of(err: GatewayError) -> StatusCode {
        ApiError::from(err).status_code()
    }

    #[test]
    fn gateway_taxonomy_maps_to_fixed_status_codes() {
        let operation = OperationDescriptor::new(ResourceKind::WorkspaceTypes, Action::Create);

        assert_eq!(
            status_of(GatewayError::Authentication(AuthError::MalformedToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(GatewayError::InactiveAccount { user_id: UserId::new() }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(GatewayError::AnonymousAccess { operation }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(GatewayError::Forbidden { role: Role::Member, operation }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(GatewayError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(GatewayError::Conflict("dup".to_string())), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_passes_through_persistence() {
        let err = GatewayError::Persistence(AtriumError::not_found("WorkspaceType", "missing"));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn anonymous_access_is_distinct_from_forbidden() {
        let operation = OperationDescriptor::new(ResourceKind::WorkspaceTypes, Action::Create);
        let anonymous = ApiError::from(GatewayError::AnonymousAccess { operation });
        assert!(matches!(anonymous, ApiError::BadImplementation(_)));

        let forbidden =
            ApiError::from(GatewayError::Forbidden { role: Role::Member, operation });
        assert!(matches!(forbidden, ApiError::Forbidden(_)));
    }
}
