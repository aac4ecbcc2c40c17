//! HTTP request handlers organized by resource type

pub mod health;
pub mod users;
pub mod workspace_types;

pub use health::health_handler;
pub use users::{create_user_handler, deactivate_user_handler, list_users_handler};
pub use workspace_types::{
    create_workspace_type_handler, delete_workspace_type_handler, get_workspace_type_handler,
    list_workspace_types_handler,
};
