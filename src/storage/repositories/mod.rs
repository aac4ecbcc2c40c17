//! Repository traits and their SQLx implementations.

pub mod session;
pub mod user;
pub mod workspace_type;

pub use session::{SessionRepository, SqlxSessionRepository};
pub use user::{SqlxUserRepository, UserRepository};
pub use workspace_type::{SqlxWorkspaceTypeRepository, WorkspaceTypeRepository};
