//! Closed payload schemas.
//!
//! Each resource kind declares the fields its payload may carry. Validation
//! is closed: a field the schema does not declare is a violation even when
//! every declared field is present and well-typed. Checks run in a fixed
//! order — required-field presence, then types, then undeclared fields — so
//! the first reported problem is deterministic.

use serde_json::{Map, Value};
use thiserror::Error;

/// Untyped key-value payload as received from the transport layer.
pub type RawPayload = Map<String, Value>;

/// JSON type a declared field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Boolean,
    Integer,
    Object,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Object => "object",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Object => value.is_object(),
        }
    }
}

/// Declaration of a single schema field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type, required: true }
    }

    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type, required: false }
    }
}

/// Closed schema for one resource kind's payload.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Validate `payload` against this schema.
    ///
    /// On success the returned [`ValidFields`] is an independent copy; the
    /// caller-supplied payload is not aliased.
    pub fn validate(&self, payload: &RawPayload) -> Result<ValidFields, SchemaViolation> {
        for spec in self.fields.iter().filter(|spec| spec.required) {
            if !payload.contains_key(spec.name) {
                return Err(SchemaViolation::MissingField(spec.name));
            }
        }

        for spec in self.fields {
            if let Some(value) = payload.get(spec.name) {
                if !spec.field_type.matches(value) {
                    return Err(SchemaViolation::WrongType {
                        field: spec.name.to_string(),
                        expected: spec.field_type.as_str(),
                    });
                }
            }
        }

        if let Some(unknown) = payload.keys().find(|key| self.field(key).is_none()) {
            return Err(SchemaViolation::UndeclaredField(unknown.clone()));
        }

        Ok(ValidFields(payload.clone()))
    }
}

/// Payload that passed schema validation, detached from the raw input.
#[derive(Debug, Clone)]
pub struct ValidFields(RawPayload);

impl ValidFields {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

/// A single schema violation; validation stops at the first one found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' must be a {expected}")]
    WrongType { field: String, expected: &'static str },
    #[error("unknown field '{0}'")]
    UndeclaredField(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static TEST_SCHEMA: Schema = Schema::new(&[
        FieldSpec::required("id", FieldType::String),
        FieldSpec::optional("name", FieldType::String),
        FieldSpec::optional("enabled", FieldType::Boolean),
    ]);

    fn payload(value: Value) -> RawPayload {
        value.as_object().expect("object literal").clone()
    }

    #[test]
    fn accepts_conforming_payload() {
        let fields = TEST_SCHEMA
            .validate(&payload(json!({"id": "abc", "name": "A type", "enabled": true})))
            .expect("valid payload");
        assert_eq!(fields.get_str("id"), Some("abc"));
        assert_eq!(fields.get("enabled"), Some(&json!(true)));
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        assert!(TEST_SCHEMA.validate(&payload(json!({"id": "abc"}))).is_ok());
    }

    #[test]
    fn missing_required_field_is_reported_first() {
        // The payload also carries an undeclared field; presence of the
        // required field is checked before the closed-schema pass.
        let err = TEST_SCHEMA
            .validate(&payload(json!({"surprise": "data"})))
            .unwrap_err();
        assert_eq!(err, SchemaViolation::MissingField("id"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = TEST_SCHEMA.validate(&payload(json!({"id": 7}))).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::WrongType { field: "id".to_string(), expected: "string" }
        );

        let err = TEST_SCHEMA
            .validate(&payload(json!({"id": "abc", "enabled": "yes"})))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::WrongType { field: "enabled".to_string(), expected: "boolean" }
        );
    }

    #[test]
    fn null_is_not_a_valid_field_value() {
        let err = TEST_SCHEMA
            .validate(&payload(json!({"id": "abc", "name": null})))
            .unwrap_err();
        assert!(matches!(err, SchemaViolation::WrongType { .. }));
    }

    #[test]
    fn undeclared_field_is_rejected_even_when_rest_is_valid() {
        let err = TEST_SCHEMA
            .validate(&payload(json!({"id": "abc", "invalid": "data"})))
            .unwrap_err();
        assert_eq!(err, SchemaViolation::UndeclaredField("invalid".to_string()));
    }

    #[test]
    fn valid_fields_are_an_independent_copy() {
        let mut raw = payload(json!({"id": "abc"}));
        let fields = TEST_SCHEMA.validate(&raw).expect("valid payload");
        raw.insert("id".to_string(), json!("mutated"));
        assert_eq!(fields.get_str("id"), Some("abc"));
    }
}
