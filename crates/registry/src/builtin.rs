//! Built-in resource descriptors for the public registry endpoints.
//!
//! Each descriptor binds a resource name to the API path it is served from,
//! the schema its input parameters must satisfy, and the context used to
//! rename response vocabulary terms to canonical field names. The set is
//! registered once by [`crate::ResourceRegistry::builtin`].

use osh_types::{ContextSpec, FieldSchema, FieldSpec, InputSchema, ResourceDescriptor};

/// Base vocabulary URI shared by the built-in contexts.
pub const VOCAB: &str = "https://vocab.opensupplyhub.org/";

/// The complete built-in descriptor set, in registration order.
pub fn descriptors() -> Vec<ResourceDescriptor> {
    vec![
        countries(),
        contributors(),
        contributor_lists(),
        facilities(),
        sectors(),
        product_types(),
        facility_processing_types(),
        workers_ranges(),
    ]
}

/// A contributor reference is either a numeric ID or a name of 1 to 200
/// characters; no other shape is valid input.
fn contributor_ref() -> FieldSchema {
    FieldSchema::AnyOf {
        branches: vec![FieldSchema::Integer, FieldSchema::bounded_string(1, 200)],
    }
}

fn countries() -> ResourceDescriptor {
    ResourceDescriptor {
        name: "countries".into(),
        path: "/api/countries/".into(),
        summary: "ISO 3166 country codes and names known to the registry".into(),
        input_schema: InputSchema::empty(),
        context: ContextSpec::new(VOCAB)
            .term("CountryCode", "iso_3166_2")
            .term("CountryName", "country"),
    }
}

fn contributors() -> ResourceDescriptor {
    ResourceDescriptor {
        name: "contributors".into(),
        path: "/api/contributors/".into(),
        summary: "Organizations contributing facility data".into(),
        input_schema: InputSchema::empty(),
        context: ContextSpec::new(VOCAB)
            .term("ContributorID", "contributor_id")
            .term("ContributorName", "contributor_name"),
    }
}

fn contributor_lists() -> ResourceDescriptor {
    ResourceDescriptor {
        name: "contributor_lists".into(),
        path: "/api/contributor-lists/".into(),
        summary: "Facility lists uploaded by a specific contributor".into(),
        input_schema: InputSchema::empty().field(
            "contributor_id",
            FieldSpec::required(contributor_ref()).describe("Numeric contributor ID or contributor name"),
        ),
        context: ContextSpec::new(VOCAB)
            .term("ContributorListID", "list_id")
            .term("ContributorListName", "list_name"),
    }
}

fn facilities() -> ResourceDescriptor {
    ResourceDescriptor {
        name: "facilities".into(),
        path: "/api/facilities/".into(),
        summary: "Facility search returning GeoJSON features".into(),
        input_schema: InputSchema::empty()
            .field(
                "page",
                FieldSpec::optional(FieldSchema::Integer).describe("Page number within the paginated result set"),
            )
            .field(
                "page_size",
                FieldSpec::optional(FieldSchema::Integer).describe("Number of results to return per page"),
            )
            .field(
                "q",
                FieldSpec::optional(FieldSchema::bounded_string(1, 200)).describe("Facility name or OS ID"),
            )
            .field(
                "contributors",
                FieldSpec::optional(contributor_ref()).describe("Restrict to facilities from this contributor"),
            )
            .field(
                "lists",
                FieldSpec::optional(FieldSchema::Integer).describe("Restrict to facilities from this list"),
            )
            .field(
                "countries",
                FieldSpec::optional(FieldSchema::bounded_string(2, 2)).describe("ISO 3166-2 alpha-2 country code"),
            )
            .field(
                "parent_company",
                FieldSpec::optional(contributor_ref()).describe("Contributor ID or name of the parent company"),
            )
            .field("facility_type", FieldSpec::optional(FieldSchema::string()))
            .field("processing_type", FieldSpec::optional(FieldSchema::string()))
            .field("product_type", FieldSpec::optional(FieldSchema::string()))
            .field(
                "number_of_workers",
                FieldSpec::optional(FieldSchema::string()).describe("Standardized workers range, e.g. \"1001-5000\""),
            )
            .field("native_language_name", FieldSpec::optional(FieldSchema::string()))
            .field(
                "sectors",
                FieldSpec::optional(FieldSchema::string()).describe("Sector names as returned by the sectors resource"),
            )
            .field(
                "detail",
                FieldSpec::optional(FieldSchema::Boolean).describe("Include contributor and extended-field detail"),
            ),
        context: ContextSpec::new(VOCAB).term("id", "os_id"),
    }
}

fn sectors() -> ResourceDescriptor {
    ResourceDescriptor {
        name: "sectors".into(),
        path: "/api/sectors/".into(),
        summary: "Sector names facilities can belong to".into(),
        input_schema: InputSchema::empty(),
        context: ContextSpec::new(VOCAB).term("Sector", "sector"),
    }
}

fn product_types() -> ResourceDescriptor {
    ResourceDescriptor {
        name: "product_types".into(),
        path: "/api/product-types/".into(),
        summary: "Product types reported across facilities".into(),
        input_schema: InputSchema::empty(),
        context: ContextSpec::new(VOCAB).term("ProductType", "product_type"),
    }
}

fn facility_processing_types() -> ResourceDescriptor {
    ResourceDescriptor {
        name: "facility_processing_types".into(),
        path: "/api/facility-processing-types/".into(),
        summary: "Facility types and their allowed processing types".into(),
        input_schema: InputSchema::empty(),
        context: ContextSpec::new(VOCAB)
            .term("facilityType", "facility_type")
            .term("processingTypes", "processing_types"),
    }
}

fn workers_ranges() -> ResourceDescriptor {
    ResourceDescriptor {
        name: "workers_ranges".into(),
        path: "/api/workers-ranges/".into(),
        summary: "Standardized number-of-workers ranges".into(),
        input_schema: InputSchema::empty(),
        context: ContextSpec::new(VOCAB).term("WorkersRange", "workers_range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributor_ref_accepts_both_shapes() {
        let spec = FieldSpec::optional(contributor_ref());
        assert!(osh_util::validation::field_violations("contributors", &spec, Some(&serde_json::json!(42))).is_empty());
        assert!(osh_util::validation::field_violations("contributors", &spec, Some(&serde_json::json!("Acme"))).is_empty());
        assert!(!osh_util::validation::field_violations("contributors", &spec, Some(&serde_json::json!(4.2))).is_empty());
    }

    #[test]
    fn facility_processing_types_context_renames_camel_case_terms() {
        let descriptor = facility_processing_types();
        let payload = serde_json::json!([
            {"facilityType": "Final Product Assembly", "processingTypes": ["Cutting", "Sewing"]}
        ]);

        let records = osh_util::jsonld::map_payload(&descriptor, &payload).unwrap();
        assert!(records[0].get("facility_type").is_some());
        assert!(records[0].get("processing_types").is_some());
    }
}
