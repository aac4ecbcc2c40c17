//! Operation descriptors pairing a resource kind with an action.
//!
//! Every gated endpoint is described by one static [`OperationDescriptor`];
//! the authorization policy is a total function over these descriptors.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A class of persisted entity with its own schema and authorization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    WorkspaceTypes,
    Users,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::WorkspaceTypes => "workspace-types",
            ResourceKind::Users => "users",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Action performed against a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static description of what an endpoint does, used for policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    pub resource: ResourceKind,
    pub action: Action,
}

impl OperationDescriptor {
    pub const fn new(resource: ResourceKind, action: Action) -> Self {
        Self { resource, action }
    }

    /// Whether the operation changes state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self.action, Action::Read)
    }
}

impl Display for OperationDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}
