//! # Validated Request Structures
//!
//! Typed request structures extracted from schema-validated payloads. Each
//! resource kind declares its closed [`Schema`] here next to the request
//! type the gateway hands to the owning service.

use validator::ValidateEmail;

use crate::domain::{Role, WorkspaceTypeId};
use crate::errors::AtriumError;
use crate::validation::schema::{FieldSpec, FieldType, Schema, ValidFields};

/// Longest accepted display name.
const MAX_NAME_LEN: usize = 128;
/// Longest accepted description.
const MAX_DESCRIPTION_LEN: usize = 1024;

/// Closed schema for workspace type creation payloads.
pub static WORKSPACE_TYPE_CREATE_SCHEMA: Schema = Schema::new(&[
    FieldSpec::required("id", FieldType::String),
    FieldSpec::optional("name", FieldType::String),
    FieldSpec::optional("description", FieldType::String),
]);

/// Validated request for creating a workspace type.
#[derive(Debug, Clone)]
pub struct CreateWorkspaceTypeRequest {
    pub id: WorkspaceTypeId,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateWorkspaceTypeRequest {
    /// Build the typed request from schema-validated fields.
    pub fn from_valid(fields: &ValidFields) -> Result<Self, AtriumError> {
        let raw_id = fields
            .get_str("id")
            .ok_or_else(|| AtriumError::internal("schema-validated payload lost its id field"))?;
        let id = WorkspaceTypeId::parse(raw_id)
            .map_err(|e| AtriumError::validation_field(e.to_string(), "id"))?;

        let name = fields.get_str("name").map(str::to_string);
        if let Some(name) = &name {
            if name.is_empty() || name.len() > MAX_NAME_LEN {
                return Err(AtriumError::validation_field(
                    format!("name must be 1-{} characters", MAX_NAME_LEN),
                    "name",
                ));
            }
        }

        let description = fields.get_str("description").map(str::to_string);
        if let Some(description) = &description {
            if description.len() > MAX_DESCRIPTION_LEN {
                return Err(AtriumError::validation_field(
                    format!("description must be at most {} characters", MAX_DESCRIPTION_LEN),
                    "description",
                ));
            }
        }

        Ok(Self { id, name, description })
    }
}

/// Closed schema for user creation payloads.
pub static USER_CREATE_SCHEMA: Schema = Schema::new(&[
    FieldSpec::required("email", FieldType::String),
    FieldSpec::required("name", FieldType::String),
    FieldSpec::optional("role", FieldType::String),
]);

/// Validated request for creating a user account.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl CreateUserRequest {
    /// Build the typed request from schema-validated fields.
    ///
    /// The role defaults to `member` when omitted.
    pub fn from_valid(fields: &ValidFields) -> Result<Self, AtriumError> {
        let email = fields
            .get_str("email")
            .ok_or_else(|| AtriumError::internal("schema-validated payload lost its email field"))?
            .trim()
            .to_string();
        if !email.validate_email() {
            return Err(AtriumError::validation_field("invalid email address", "email"));
        }

        let name = fields
            .get_str("name")
            .ok_or_else(|| AtriumError::internal("schema-validated payload lost its name field"))?
            .to_string();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(AtriumError::validation_field(
                format!("name must be 1-{} characters", MAX_NAME_LEN),
                "name",
            ));
        }

        let role = match fields.get_str("role") {
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|e| AtriumError::validation_field(e.to_string(), "role"))?,
            None => Role::Member,
        };

        Ok(Self { email, name, role })
    }
}
