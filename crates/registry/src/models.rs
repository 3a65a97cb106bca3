//! The resource registry: a read-only mapping from resource name to
//! descriptor.

use indexmap::IndexMap;
use osh_types::{Error, ResourceDescriptor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builtin;

/// The registry of all resources the client can address.
///
/// Populated once at bootstrap and treated as read-only afterward; lookups
/// are safe from multiple callers because nothing mutates the registry after
/// construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceRegistry {
    /// Registered descriptors keyed by resource name, in registration order.
    resources: IndexMap<String, ResourceDescriptor>,
}

impl ResourceRegistry {
    /// An empty registry, for callers that bootstrap their own descriptors.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry pre-populated with the built-in descriptor set covering
    /// the public registry endpoints.
    pub fn builtin() -> Result<Self, Error> {
        let mut registry = Self::new();
        for descriptor in builtin::descriptors() {
            registry.register(descriptor)?;
        }
        debug!(resources = registry.resources.len(), "registered built-in resources");
        Ok(registry)
    }

    /// Registers a descriptor.
    ///
    /// Registration is a one-time bootstrap step; a second descriptor under
    /// an already-registered name is a configuration defect, not an update.
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Result<(), Error> {
        if self.resources.contains_key(&descriptor.name) {
            return Err(Error::Configuration {
                detail: format!("resource '{}' is already registered", descriptor.name),
            });
        }
        self.resources.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Looks up a descriptor by resource name.
    pub fn lookup(&self, name: &str) -> Result<&ResourceDescriptor, Error> {
        self.resources.get(name).ok_or_else(|| Error::UnknownResource { name: name.into() })
    }

    /// Registered resource names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the registry holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osh_types::{ContextSpec, InputSchema};

    fn descriptor(name: &str) -> ResourceDescriptor {
        ResourceDescriptor {
            name: name.into(),
            path: format!("/api/{name}/"),
            summary: format!("Test resource {name}"),
            input_schema: InputSchema::empty(),
            context: ContextSpec::new("https://vocab.opensupplyhub.org/").term("ID", "id"),
        }
    }

    #[test]
    fn duplicate_registration_is_a_configuration_error() {
        let mut registry = ResourceRegistry::new();
        registry.register(descriptor("countries")).unwrap();

        let error = registry.register(descriptor("countries")).unwrap_err();
        match error {
            Error::Configuration { detail } => assert!(detail.contains("countries"), "detail: {detail}"),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_registration_keeps_the_original_descriptor() {
        let mut registry = ResourceRegistry::new();
        let mut original = descriptor("countries");
        original.summary = "original".into();
        registry.register(original).unwrap();

        let mut replacement = descriptor("countries");
        replacement.summary = "replacement".into();
        let _ = registry.register(replacement);

        assert_eq!(registry.lookup("countries").unwrap().summary, "original");
    }

    #[test]
    fn lookup_of_unregistered_name_fails() {
        let registry = ResourceRegistry::new();
        let error = registry.lookup("nope").unwrap_err();
        match error {
            Error::UnknownResource { name } => assert_eq!(name, "nope"),
            other => panic!("expected unknown-resource error, got {other:?}"),
        }
    }

    #[test]
    fn names_follow_registration_order() {
        let mut registry = ResourceRegistry::new();
        registry.register(descriptor("countries")).unwrap();
        registry.register(descriptor("contributors")).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["countries", "contributors"]);
    }
}
