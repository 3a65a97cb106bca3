//! Input-parameter validation against per-resource schemas.
//!
//! Validation is structural and type-directed: each declared field's value is
//! checked against its constraint tree, and `anyOf` constraints are checked
//! branch by branch so the final error spells out why every branch was
//! rejected. The schema is closed: parameters not declared by the resource
//! are rejected rather than silently dropped.

use osh_types::{Error, FieldSchema, FieldSpec, ResourceDescriptor};
use serde_json::{Map, Value};

/// Represents a single structural constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolation {
    /// Parameter name the violation occurred on.
    pub field: String,
    /// Stable rule identifier for machine-readable handling.
    pub rule: String,
    /// Human-readable validation error message.
    pub message: String,
}

impl ValidationViolation {
    /// Creates a new validation violation.
    pub fn new(field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Validates `params` against the resource's declared input schema.
///
/// Fields are checked in the schema's declaration order and the first failing
/// field is reported; the error message lists every constraint that field
/// violated, not just the first. After the declared fields pass, any
/// parameter not present in the schema fails validation.
pub fn validate_params(descriptor: &ResourceDescriptor, params: &Map<String, Value>) -> Result<(), Error> {
    for (name, spec) in &descriptor.input_schema.fields {
        let violations = field_violations(name, spec, params.get(name));
        if let Some(first) = violations.first() {
            let detail = violations
                .iter()
                .map(|violation| violation.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::Validation {
                field: first.field.clone(),
                detail,
            });
        }
    }

    for name in params.keys() {
        if !descriptor.input_schema.fields.contains_key(name) {
            return Err(Error::Validation {
                field: name.clone(),
                detail: "parameter is not declared by the resource's input schema".into(),
            });
        }
    }

    Ok(())
}

/// Collects the violations for a single declared field.
///
/// An absent optional field yields no violations; an absent required field
/// yields a `required` violation.
pub fn field_violations(name: &str, spec: &FieldSpec, value: Option<&Value>) -> Vec<ValidationViolation> {
    let Some(value) = value else {
        if spec.required {
            return vec![ValidationViolation::new(name, "required", "required parameter is missing")];
        }
        return Vec::new();
    };

    schema_failures(&spec.schema, value)
        .into_iter()
        .map(|(rule, message)| ValidationViolation::new(name, rule, message))
        .collect()
}

/// Checks a value against a constraint tree, returning one `(rule, message)`
/// pair per violated constraint. An empty result means the value satisfies
/// the tree.
fn schema_failures(schema: &FieldSchema, value: &Value) -> Vec<(String, String)> {
    match schema {
        FieldSchema::Integer => {
            if value.is_i64() || value.is_u64() {
                Vec::new()
            } else {
                vec![("type_integer".into(), "not an integer".into())]
            }
        }
        FieldSchema::Number => {
            if value.is_number() {
                Vec::new()
            } else {
                vec![("type_number".into(), "not a number".into())]
            }
        }
        FieldSchema::Boolean => {
            if value.is_boolean() {
                Vec::new()
            } else {
                vec![("type_boolean".into(), "not a boolean".into())]
            }
        }
        FieldSchema::String { min_length, max_length } => {
            let Some(text) = value.as_str() else {
                return vec![("type_string".into(), "not a string".into())];
            };
            let length = text.chars().count();
            let mut failures = Vec::new();
            if let Some(min) = min_length
                && length < *min
            {
                failures.push(("min_length".into(), format!("string length {length} < minLength {min}")));
            }
            if let Some(max) = max_length
                && length > *max
            {
                failures.push(("max_length".into(), format!("string length {length} > maxLength {max}")));
            }
            failures
        }
        FieldSchema::AnyOf { branches } => {
            let mut combined = Vec::new();
            for branch in branches {
                let failures = schema_failures(branch, value);
                if failures.is_empty() {
                    return Vec::new();
                }
                combined.extend(failures);
            }
            combined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osh_types::{ContextSpec, InputSchema};
    use serde_json::json;

    fn contributor_lists_descriptor() -> ResourceDescriptor {
        ResourceDescriptor {
            name: "contributor_lists".into(),
            path: "/api/contributor-lists/".into(),
            summary: "Lists for a specific contributor".into(),
            input_schema: InputSchema::empty().field(
                "contributor_id",
                FieldSpec::optional(FieldSchema::AnyOf {
                    branches: vec![FieldSchema::Integer, FieldSchema::bounded_string(1, 200)],
                }),
            ),
            context: ContextSpec::new("https://vocab.opensupplyhub.org/")
                .term("ContributorListID", "list_id")
                .term("ContributorListName", "list_name"),
        }
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn accepts_integer_contributor_id() {
        let descriptor = contributor_lists_descriptor();
        assert!(validate_params(&descriptor, &params(json!({"contributor_id": 42}))).is_ok());
    }

    #[test]
    fn accepts_string_contributor_id_at_bounds() {
        let descriptor = contributor_lists_descriptor();
        assert!(validate_params(&descriptor, &params(json!({"contributor_id": "a"}))).is_ok());
        let long = "x".repeat(200);
        assert!(validate_params(&descriptor, &params(json!({"contributor_id": long}))).is_ok());
    }

    #[test]
    fn rejects_empty_string_with_both_branch_reasons() {
        let descriptor = contributor_lists_descriptor();
        let error = validate_params(&descriptor, &params(json!({"contributor_id": ""}))).unwrap_err();
        match error {
            Error::Validation { field, detail } => {
                assert_eq!(field, "contributor_id");
                assert!(detail.contains("not an integer"), "detail: {detail}");
                assert!(detail.contains("string length 0 < minLength 1"), "detail: {detail}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_overlong_string() {
        let descriptor = contributor_lists_descriptor();
        let long = "x".repeat(201);
        let error = validate_params(&descriptor, &params(json!({"contributor_id": long}))).unwrap_err();
        match error {
            Error::Validation { detail, .. } => {
                assert!(detail.contains("string length 201 > maxLength 200"), "detail: {detail}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_float_matching_neither_branch() {
        let descriptor = contributor_lists_descriptor();
        let error = validate_params(&descriptor, &params(json!({"contributor_id": 4.2}))).unwrap_err();
        match error {
            Error::Validation { field, detail } => {
                assert_eq!(field, "contributor_id");
                assert!(detail.contains("not an integer"), "detail: {detail}");
                assert!(detail.contains("not a string"), "detail: {detail}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_undeclared_parameter_by_name() {
        let descriptor = contributor_lists_descriptor();
        let error = validate_params(&descriptor, &params(json!({"unknown_field": 1}))).unwrap_err();
        match error {
            Error::Validation { field, .. } => assert_eq!(field, "unknown_field"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn reports_first_failing_field_in_declaration_order() {
        let descriptor = ResourceDescriptor {
            name: "facilities".into(),
            path: "/api/facilities/".into(),
            summary: "Facility search".into(),
            input_schema: InputSchema::empty()
                .field("page", FieldSpec::optional(FieldSchema::Integer))
                .field("q", FieldSpec::optional(FieldSchema::string())),
            context: ContextSpec::new("https://vocab.opensupplyhub.org/").term("id", "os_id"),
        };

        let error = validate_params(&descriptor, &params(json!({"q": 3, "page": "one"}))).unwrap_err();
        match error {
            Error::Validation { field, .. } => assert_eq!(field, "page"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_parameter_is_reported() {
        let descriptor = ResourceDescriptor {
            name: "facility".into(),
            path: "/api/facilities/".into(),
            summary: "Single facility".into(),
            input_schema: InputSchema::empty().field("os_id", FieldSpec::required(FieldSchema::bounded_string(1, 32))),
            context: ContextSpec::new("https://vocab.opensupplyhub.org/").term("id", "os_id"),
        };

        let error = validate_params(&descriptor, &params(json!({}))).unwrap_err();
        match error {
            Error::Validation { field, detail } => {
                assert_eq!(field, "os_id");
                assert!(detail.contains("required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn string_length_is_measured_in_characters() {
        let spec = FieldSpec::optional(FieldSchema::bounded_string(1, 3));
        let violations = field_violations("name", &spec, Some(&json!("äöü")));
        assert!(violations.is_empty(), "violations: {violations:?}");
    }
}
