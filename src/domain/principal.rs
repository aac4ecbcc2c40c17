//! Caller identity resolved once per request.
//!
//! A [`Principal`] is an immutable snapshot taken at request start: either an
//! authenticated user (with role and account state as of resolution time) or
//! the anonymous marker. It is carried through the request as an axum
//! extension and discarded at request end.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::UserId;

/// Account role determining authorization outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Error returned when role parsing fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Snapshot of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
    /// Account state as of session resolution. Inactive accounts are rejected
    /// by the gateway before any role check runs.
    pub active: bool,
}

/// Resolved identity of a request's caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Authenticated(AuthenticatedUser),
    Anonymous,
}

impl Principal {
    pub fn authenticated(user_id: UserId, role: Role, active: bool) -> Self {
        Principal::Authenticated(AuthenticatedUser { user_id, role, active })
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }

    pub fn as_authenticated(&self) -> Option<&AuthenticatedUser> {
        match self {
            Principal::Authenticated(user) => Some(user),
            Principal::Anonymous => None,
        }
    }
}
