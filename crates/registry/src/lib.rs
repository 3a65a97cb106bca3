//! Registry crate for the Open Supply Hub client's resource descriptors.
//!
//! This crate provides the read-only registry that binds each API resource
//! name to its input schema and output context, plus the built-in descriptor
//! set covering the public registry endpoints.

pub mod builtin;
pub mod models;

pub use models::ResourceRegistry;
pub use osh_types::{ContextSpec, FieldSchema, FieldSpec, InputSchema, ResourceDescriptor};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// Verifies the built-in descriptor set is non-empty, uniquely named,
    /// and fully formed (every descriptor has a path and a usable context).
    #[test]
    fn builtin_descriptors_are_unique_and_complete() {
        let registry = ResourceRegistry::builtin().expect("load built-in descriptors");
        assert!(!registry.is_empty(), "built-in registry should not be empty");

        let mut seen = HashSet::new();
        for name in registry.names() {
            assert!(seen.insert(name.to_string()), "duplicate resource name: {name}");
            let descriptor = registry.lookup(name).expect("registered name resolves");
            assert!(descriptor.path.starts_with("/api/"), "unexpected path for {name}: {}", descriptor.path);
            assert!(!descriptor.context.vocab.is_empty(), "missing vocab for {name}");
            assert!(!descriptor.context.is_empty(), "empty context for {name}");
        }
    }

    #[test]
    fn contributor_lists_descriptor_maps_the_documented_scenario() {
        let registry = ResourceRegistry::builtin().unwrap();
        let descriptor = registry.lookup("contributor_lists").unwrap();
        let payload = serde_json::json!({
            "@context": {"@vocab": descriptor.context.vocab},
            "ContributorListID": 7,
            "ContributorListName": "Acme"
        });

        let records = osh_util::jsonld::map_payload(descriptor, &payload).unwrap();
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            serde_json::json!([{"list_id": 7, "list_name": "Acme"}])
        );
    }
}
