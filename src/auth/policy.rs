//! Role-based authorization policy.
//!
//! The policy is a total, table-driven function of `(role, operation)`:
//! every pair has a defined outcome and there is no default-allow path.
//! Anonymous callers are classified separately from role mismatches — a
//! protected operation reached without any authentication indicates the
//! route was exposed without its authentication middleware, which is a
//! server defect rather than a client permission problem.

use thiserror::Error;

use crate::domain::{Action, OperationDescriptor, Principal, ResourceKind, Role};

/// Failure outcomes of a policy decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Anonymous caller reached a protected operation.
    #[error("anonymous access to protected operation {operation}")]
    AnonymousAccess { operation: OperationDescriptor },
    /// Authenticated caller's role does not permit the operation.
    #[error("role {role} may not perform {operation}")]
    RoleDenied { role: Role, operation: OperationDescriptor },
}

/// Whether `role` is permitted to perform `operation`.
///
/// The match is exhaustive over both enums so adding a resource kind or an
/// action forces a policy decision at compile time.
pub fn role_allows(role: Role, operation: OperationDescriptor) -> bool {
    match (operation.resource, operation.action) {
        // Workspace types: mutations are admin-only, reads are open to any
        // authenticated role.
        (ResourceKind::WorkspaceTypes, Action::Create)
        | (ResourceKind::WorkspaceTypes, Action::Update)
        | (ResourceKind::WorkspaceTypes, Action::Delete) => matches!(role, Role::Admin),
        (ResourceKind::WorkspaceTypes, Action::Read) => match role {
            Role::Admin | Role::Member => true,
        },

        // User administration is entirely admin-only.
        (ResourceKind::Users, Action::Create)
        | (ResourceKind::Users, Action::Read)
        | (ResourceKind::Users, Action::Update)
        | (ResourceKind::Users, Action::Delete) => matches!(role, Role::Admin),
    }
}

/// Decide whether `principal` may perform `operation`.
///
/// The principal has already passed the account-state check; this function
/// only judges anonymity and role.
pub fn authorize(
    principal: &Principal,
    operation: OperationDescriptor,
) -> Result<(), PolicyError> {
    match principal {
        Principal::Anonymous => Err(PolicyError::AnonymousAccess { operation }),
        Principal::Authenticated(user) => {
            if role_allows(user.role, operation) {
                Ok(())
            } else {
                Err(PolicyError::RoleDenied { role: user.role, operation })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn op(resource: ResourceKind, action: Action) -> OperationDescriptor {
        OperationDescriptor::new(resource, action)
    }

    #[test]
    fn admin_may_mutate_workspace_types() {
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(role_allows(Role::Admin, op(ResourceKind::WorkspaceTypes, action)));
        }
    }

    #[test]
    fn member_may_only_read_workspace_types() {
        assert!(role_allows(Role::Member, op(ResourceKind::WorkspaceTypes, Action::Read)));
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(!role_allows(Role::Member, op(ResourceKind::WorkspaceTypes, action)));
        }
    }

    #[test]
    fn user_administration_is_admin_only() {
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert!(role_allows(Role::Admin, op(ResourceKind::Users, action)));
            assert!(!role_allows(Role::Member, op(ResourceKind::Users, action)));
        }
    }

    #[test]
    fn anonymous_is_classified_separately_from_role_denial() {
        let operation = op(ResourceKind::WorkspaceTypes, Action::Create);

        let err = authorize(&Principal::Anonymous, operation).unwrap_err();
        assert_eq!(err, PolicyError::AnonymousAccess { operation });

        let member = Principal::authenticated(UserId::new(), Role::Member, true);
        let err = authorize(&member, operation).unwrap_err();
        assert_eq!(err, PolicyError::RoleDenied { role: Role::Member, operation });
    }

    #[test]
    fn sufficient_role_is_allowed() {
        let admin = Principal::authenticated(UserId::new(), Role::Admin, true);
        assert!(authorize(&admin, op(ResourceKind::WorkspaceTypes, Action::Create)).is_ok());
        assert!(authorize(&admin, op(ResourceKind::Users, Action::Update)).is_ok());
    }
}
