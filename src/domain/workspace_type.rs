//! Workspace type domain model.
//!
//! A workspace type is an admin-defined template describing a class of
//! workspaces tenants can provision. It is keyed by a caller-supplied
//! identifier that must be unique across the kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::UserId;

/// Maximum accepted length for a workspace type identifier.
pub const MAX_WORKSPACE_TYPE_ID_LEN: usize = 64;

/// Caller-supplied workspace type identifier.
///
/// Unlike the UUID-backed ids, this value is chosen by the caller and
/// validated on entry: 1 to 64 characters drawn from ASCII alphanumerics,
/// `-`, `_` and `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct WorkspaceTypeId(String);

impl WorkspaceTypeId {
    pub fn parse(s: &str) -> Result<Self, WorkspaceTypeIdError> {
        if s.is_empty() {
            return Err(WorkspaceTypeIdError::Empty);
        }
        if s.len() > MAX_WORKSPACE_TYPE_ID_LEN {
            return Err(WorkspaceTypeIdError::TooLong(s.len()));
        }
        if let Some(ch) =
            s.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(WorkspaceTypeIdError::InvalidCharacter(ch));
        }
        Ok(Self(s.to_string()))
    }

    /// Wrap a string that is already known to be valid (database retrieval).
    pub fn from_trusted(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for WorkspaceTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkspaceTypeId {
    type Err = WorkspaceTypeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for WorkspaceTypeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error returned when a workspace type identifier fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkspaceTypeIdError {
    #[error("workspace type id must not be empty")]
    Empty,
    #[error("workspace type id exceeds {MAX_WORKSPACE_TYPE_ID_LEN} characters (got {0})")]
    TooLong(usize),
    #[error("workspace type id contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// Stored representation of a workspace type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceType {
    pub id: WorkspaceTypeId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New workspace type database payload.
#[derive(Debug, Clone)]
pub struct NewWorkspaceType {
    pub id: WorkspaceTypeId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_by: UserId,
}
