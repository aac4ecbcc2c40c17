//! Payload validation for gated requests.

pub mod requests;
pub mod schema;

pub use requests::{
    CreateUserRequest, CreateWorkspaceTypeRequest, USER_CREATE_SCHEMA,
    WORKSPACE_TYPE_CREATE_SCHEMA,
};
pub use schema::{FieldSpec, FieldType, RawPayload, Schema, SchemaViolation, ValidFields};
