use osh_registry::ResourceRegistry;
use osh_util::{jsonld, validation};
use serde_json::{Value, json};

fn load_fixture() -> Value {
    let raw = include_str!("data/facilities_fixture.json");
    serde_json::from_str(raw).expect("parse facilities fixture")
}

#[test]
fn facilities_fixture_flows_through_validation_and_mapping() {
    let registry = ResourceRegistry::builtin().expect("built-in registry");
    let descriptor = registry.lookup("facilities").expect("facilities registered");

    let params = json!({"countries": "DE", "page": 1, "detail": false});
    validation::validate_params(descriptor, params.as_object().unwrap()).expect("params valid");

    let records = jsonld::map_payload(descriptor, &load_fixture()).expect("map fixture");
    assert_eq!(records.len(), 3);

    let first = &records[0];
    assert_eq!(first.get("os_id").unwrap().as_scalar(), Some(&json!("DE2021025Q8VXPN")));
    assert_eq!(first.get("lon").unwrap().as_scalar(), Some(&json!(10.8978)));
    assert_eq!(first.get("lat").unwrap().as_scalar(), Some(&json!(48.3705)));
    assert_eq!(first.get("country_code").unwrap().as_scalar(), Some(&json!("DE")));

    // Every record exposes the same field set, in the same order.
    let expected: Vec<&str> = vec![
        "os_id",
        "lon",
        "lat",
        "name",
        "address",
        "country_code",
        "country_name",
        "has_approved_claim",
        "is_closed",
    ];
    for record in &records {
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, expected);
    }
}

#[test]
fn facilities_fixture_rejects_bad_parameters_before_mapping() {
    let registry = ResourceRegistry::builtin().expect("built-in registry");
    let descriptor = registry.lookup("facilities").expect("facilities registered");

    let params = json!({"countries": "DEU"});
    let error = validation::validate_params(descriptor, params.as_object().unwrap()).unwrap_err();
    match error {
        osh_types::Error::Validation { field, detail } => {
            assert_eq!(field, "countries");
            assert!(detail.contains("maxLength 2"), "detail: {detail}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
