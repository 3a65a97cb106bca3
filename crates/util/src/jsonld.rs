//! JSON-LD response normalization.
//!
//! Response payloads arrive as JSON-LD documents whose `@context` maps
//! vocabulary terms to canonical field names. This module merges that
//! context with the resource's statically registered one, then walks the
//! payload renaming keys and preserving structure. Mapping renames and
//! restructures only; scalar values are carried through untouched.
//!
//! Unlike input validation, the output side is permissive: keys with no
//! context entry pass through under their original name, so upstream API
//! additions do not break consumers.

use indexmap::IndexMap;
use osh_types::{Error, FlatRecord, FlatValue, ResourceDescriptor};
use serde_json::{Map, Value};
use tracing::debug;

/// Resolves the effective term table for one mapping call.
///
/// The resource's static context comes first; aliases declared by the
/// payload's own `@context` override or extend it, since the payload is
/// authoritative for any naming it explicitly chose. Entries whose key
/// starts with `@` (such as `@vocab`) are context metadata, not term
/// aliases, and are skipped.
///
/// Two source terms mapping to the same canonical name make the merged
/// context ambiguous and fail the call; that is a defect in the descriptor
/// or the payload, not something to guess around.
pub fn effective_context(descriptor: &ResourceDescriptor, payload: &Value) -> Result<IndexMap<String, String>, Error> {
    let mut merged = descriptor.context.terms.clone();

    match payload.get("@context") {
        Some(Value::Object(aliases)) => {
            for (term, target) in aliases {
                if term.starts_with('@') {
                    continue;
                }
                let Some(canonical) = target.as_str() else {
                    return Err(Error::Mapping {
                        detail: format!("`@context` alias for term '{term}' must be a string"),
                    });
                };
                merged.insert(term.clone(), canonical.to_string());
            }
        }
        Some(Value::String(_)) => {
            // A bare string context is a remote vocabulary reference; it
            // declares no term aliases, so the static table stands alone.
        }
        Some(other) => {
            return Err(Error::Mapping {
                detail: format!("`@context` must be an object of term aliases, got {}", json_type_name(other)),
            });
        }
        None => {
            if descriptor.context.is_empty() {
                return Err(Error::Mapping {
                    detail: "payload carries no `@context` and the resource declares no static context".into(),
                });
            }
        }
    }

    let mut targets: IndexMap<&str, &str> = IndexMap::new();
    for (term, canonical) in &merged {
        if let Some(previous) = targets.insert(canonical.as_str(), term.as_str())
            && previous != term
        {
            return Err(Error::Mapping {
                detail: format!("terms '{previous}' and '{term}' both map to canonical name '{canonical}'"),
            });
        }
    }

    Ok(merged)
}

/// Maps a raw JSON-LD payload into a sequence of flat records.
///
/// The top level may be a single object, an array of objects, or a GeoJSON
/// `FeatureCollection` (whose features are unwrapped and flattened before
/// renaming). Sequences preserve source order; record field order is
/// first-seen order during the walk. The call either produces every record
/// or fails; no partial output is returned.
pub fn map_payload(descriptor: &ResourceDescriptor, payload: &Value) -> Result<Vec<FlatRecord>, Error> {
    let context = effective_context(descriptor, payload)?;

    let records = match payload {
        Value::Object(object) => match object.get("features").and_then(Value::as_array) {
            Some(features) => features
                .iter()
                .enumerate()
                .map(|(index, feature)| {
                    let feature = feature.as_object().ok_or_else(|| Error::Mapping {
                        detail: format!("feature {index} is not an object"),
                    })?;
                    Ok(map_object(&flatten_feature(feature), &context))
                })
                .collect::<Result<Vec<_>, Error>>()?,
            None => vec![map_object(object, &context)],
        },
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let object = item.as_object().ok_or_else(|| Error::Mapping {
                    detail: format!("top-level item {index} is not an object, got {}", json_type_name(item)),
                })?;
                Ok(map_object(object, &context))
            })
            .collect::<Result<Vec<_>, Error>>()?,
        other => {
            return Err(Error::Mapping {
                detail: format!("payload must be an object or an array of objects, got {}", json_type_name(other)),
            });
        }
    };

    debug!(resource = %descriptor.name, records = records.len(), "mapped payload");
    Ok(records)
}

/// Renames one object's keys through the context, recursing into nested
/// structure. Keys starting with `@` are JSON-LD keywords and are dropped
/// from the output.
fn map_object(object: &Map<String, Value>, context: &IndexMap<String, String>) -> FlatRecord {
    let mut record = FlatRecord::new();
    for (key, value) in object {
        if key.starts_with('@') {
            continue;
        }
        let canonical = context.get(key).cloned().unwrap_or_else(|| key.clone());
        record.insert(canonical, map_value(value, context));
    }
    record
}

fn map_value(value: &Value, context: &IndexMap<String, String>) -> FlatValue {
    match value {
        Value::Object(object) => FlatValue::Record(map_object(object, context)),
        Value::Array(items) => FlatValue::List(items.iter().map(|item| map_value(item, context)).collect()),
        scalar => FlatValue::Scalar(scalar.clone()),
    }
}

/// Flattens a GeoJSON feature into a plain object: the feature `id`, the
/// point coordinates as `lon`/`lat`, then every property. Renaming happens
/// afterwards through the ordinary context walk.
fn flatten_feature(feature: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    if let Some(id) = feature.get("id") {
        flat.insert("id".into(), id.clone());
    }
    if let Some(coordinates) = feature
        .get("geometry")
        .and_then(|geometry| geometry.get("coordinates"))
        .and_then(Value::as_array)
        && coordinates.len() >= 2
    {
        flat.insert("lon".into(), coordinates[0].clone());
        flat.insert("lat".into(), coordinates[1].clone());
    }
    if let Some(properties) = feature.get("properties").and_then(Value::as_object) {
        for (key, value) in properties {
            flat.insert(key.clone(), value.clone());
        }
    }
    flat
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
