//! The normalized output shape produced by the mapping layer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single mapped value inside a [`FlatRecord`].
///
/// Scalars are carried through untouched as raw JSON values; the mapping
/// layer renames and restructures but never coerces types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatValue {
    /// A nested record, mapped recursively with the same context.
    Record(FlatRecord),
    /// A sequence of values, preserving source order.
    List(Vec<FlatValue>),
    /// A scalar carried through without coercion.
    Scalar(Value),
}

impl FlatValue {
    /// Returns the nested record, if this value is one.
    pub fn as_record(&self) -> Option<&FlatRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the scalar JSON value, if this value is one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

/// An ordered mapping of canonical field name to mapped value.
///
/// Field order is first-seen order during the mapping walk and is stable
/// across repeated calls on identical input. A record is produced fresh per
/// response and is not mutated after being returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// The record's fields, in first-seen order.
    #[serde(flatten)]
    pub fields: IndexMap<String, FlatValue>,
}

impl FlatRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, keeping the position of an existing field with the
    /// same name.
    pub fn insert(&mut self, name: impl Into<String>, value: FlatValue) {
        self.fields.insert(name.into(), value);
    }

    /// Look up a field by canonical name.
    pub fn get(&self, name: &str) -> Option<&FlatValue> {
        self.fields.get(name)
    }

    /// Field names in record order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FlatValue)> for FlatRecord {
    fn from_iter<T: IntoIterator<Item = (String, FlatValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_keep_insertion_order() {
        let mut record = FlatRecord::new();
        record.insert("list_id", FlatValue::Scalar(json!(7)));
        record.insert("list_name", FlatValue::Scalar(json!("Acme")));

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["list_id", "list_name"]);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut record = FlatRecord::new();
        record.insert("list_id", FlatValue::Scalar(json!(7)));
        record.insert("list_name", FlatValue::Scalar(json!("Acme")));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"list_id": 7, "list_name": "Acme"}));
    }

    #[test]
    fn nested_records_round_trip() {
        let mut inner = FlatRecord::new();
        inner.insert("lon", FlatValue::Scalar(json!(10.9)));
        inner.insert("lat", FlatValue::Scalar(json!(48.4)));

        let mut record = FlatRecord::new();
        record.insert("os_id", FlatValue::Scalar(json!("DE20210250HH1")));
        record.insert("location", FlatValue::Record(inner));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["location"]["lat"], json!(48.4));
    }
}
