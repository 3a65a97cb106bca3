//! Static descriptions of API resources: input schemas and output contexts.
//!
//! A [`ResourceDescriptor`] binds a resource name to everything the access
//! layer needs to know about it: the API path it is served from, the schema
//! its input parameters must satisfy, and the JSON-LD context used to rename
//! response keys to canonical field names. Descriptors are registered once at
//! bootstrap and never mutated afterward.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Constraint tree for a single input parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldSchema {
    /// The value must be a JSON integer.
    Integer,
    /// The value must be any JSON number.
    Number,
    /// The value must be a JSON boolean.
    Boolean,
    /// The value must be a JSON string, optionally length-bounded.
    ///
    /// Bounds are inclusive and measured in characters.
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    /// The value must satisfy at least one of the listed branches.
    AnyOf {
        branches: Vec<FieldSchema>,
    },
}

impl FieldSchema {
    /// A string schema with inclusive character-length bounds.
    pub fn bounded_string(min_length: usize, max_length: usize) -> Self {
        Self::String {
            min_length: Some(min_length),
            max_length: Some(max_length),
        }
    }

    /// A string schema with no length bounds.
    pub fn string() -> Self {
        Self::String {
            min_length: None,
            max_length: None,
        }
    }

    /// Short label used in violation messages ("integer", "string", ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::String { .. } => "string",
            Self::AnyOf { .. } => "anyOf",
        }
    }
}

/// Declaration of a single input parameter: its constraint tree plus whether
/// the parameter may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Constraint tree the value must satisfy when present.
    pub schema: FieldSchema,
    /// Whether the parameter must be present.
    #[serde(default)]
    pub required: bool,
    /// Human-readable description of the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    /// An optional parameter with the given constraint tree.
    pub fn optional(schema: FieldSchema) -> Self {
        Self {
            schema,
            required: false,
            description: None,
        }
    }

    /// A required parameter with the given constraint tree.
    pub fn required(schema: FieldSchema) -> Self {
        Self {
            schema,
            required: true,
            description: None,
        }
    }

    /// Attach a description, builder-style.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Closed input schema for one resource.
///
/// Field iteration order is declaration order; validation reports the first
/// failing field in this order. Parameters not declared here are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    /// Declared parameters, in declaration order.
    pub fields: IndexMap<String, FieldSpec>,
}

impl InputSchema {
    /// An empty schema: the resource accepts no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a field declaration, builder-style.
    ///
    /// Later declarations of the same name replace earlier ones without
    /// changing the field's position.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }
}

/// Output JSON-LD context for one resource: a base vocabulary URI plus a
/// table of term aliases (vocabulary term -> canonical field name).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    /// Base vocabulary URI the terms are qualified against.
    pub vocab: String,
    /// Term aliases: vocabulary term -> canonical field name, in declaration
    /// order.
    pub terms: IndexMap<String, String>,
}

impl ContextSpec {
    /// A context rooted at the given vocabulary URI with no aliases yet.
    pub fn new(vocab: impl Into<String>) -> Self {
        Self {
            vocab: vocab.into(),
            terms: IndexMap::new(),
        }
    }

    /// Add a term alias, builder-style.
    pub fn term(mut self, source: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.terms.insert(source.into(), canonical.into());
        self
    }

    /// Whether this context declares any term aliases.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Static, immutable description of one API resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Unique resource name callers use to address this resource.
    pub name: String,
    /// API path the resource is served from, e.g. `/api/contributor-lists/`.
    pub path: String,
    /// One-line description of the resource.
    pub summary: String,
    /// Schema the input parameters must satisfy.
    pub input_schema: InputSchema,
    /// Context used to rename response keys to canonical field names.
    pub context: ContextSpec,
}
