mod common;

use common::Counting;
use featuregraph::features::{Input, Scale};
use featuregraph::registry::{DescriptionReader, FromDescription, Registry, TypeTag};
use featuregraph::{Feature, FeatureError, FeatureMap, Result};

fn tokens(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|s| s.to_string()).collect()
}

fn build_counting(description: &[String], features: &FeatureMap) -> Result<Feature> {
    let mut reader = DescriptionReader::new(description, features)?;
    let id = reader.id();
    let inputs = reader.remaining_inputs()?;
    Feature::with_id(id, Counting::with_warmup(0), inputs)
}

#[test]
fn test_registry_register_and_list() {
    let mut registry = Registry::new();
    assert!(registry.registered_types().is_empty());

    registry.register("Counting", build_counting).unwrap();
    registry.register_kind::<Input>().unwrap();

    assert_eq!(registry.registered_types(), vec!["Counting", "Input"]);
    assert!(registry.contains("Counting"));
    assert!(!registry.contains("Scale"));
}

#[test]
fn test_last_registration_wins() {
    let mut registry = Registry::new();
    assert!(!registry.register("Scale", build_counting).unwrap());
    assert!(registry
        .register(Scale::TYPE_TAG, Scale::from_description)
        .unwrap());

    let mut features = FeatureMap::new();
    features.insert(
        "in".to_string(),
        Feature::with_id("in", Input::new(1), vec![]).unwrap(),
    );
    let scaled = registry
        .from_description(&tokens(&["s", "Scale", "in", "2"]), &features)
        .unwrap();

    assert_eq!(scaled.type_tag(), "Scale");
    assert_eq!(scaled.kind_as::<Scale>().unwrap().factor(), 2.0);
}

#[test]
fn test_unknown_type_names_the_tag() {
    let registry = Registry::with_builtins();

    let err = registry
        .from_description(&tokens(&["x", " Bogus "]), &FeatureMap::new())
        .unwrap_err();

    match err {
        FeatureError::Configuration { type_tag } => assert_eq!(type_tag, "Bogus"),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_from_description_trims_id_and_type() {
    let registry = Registry::with_builtins();

    let input = registry
        .from_description(&tokens(&["  raw ", " Input\t", "3"]), &FeatureMap::new())
        .unwrap();

    assert_eq!(input.id(), "raw");
    assert_eq!(input.num_columns(), 3);
}

#[test]
fn test_factory_resolves_inputs_from_map() {
    let registry = Registry::with_builtins();
    let mut features = FeatureMap::new();
    let raw = registry
        .from_description(&tokens(&["raw", "Input", "4"]), &features)
        .unwrap();
    features.insert(raw.id().to_string(), raw.clone());

    let select = registry
        .from_description(&tokens(&["sel", "Select", "raw", "1", "2"]), &features)
        .unwrap();

    assert!(select.inputs()[0].ptr_eq(&raw));
    assert!(raw.dependents()[0].ptr_eq(&select));
    assert_eq!(select.num_columns(), 2);
}

#[test]
fn test_unknown_input_id_is_a_range_error() {
    let registry = Registry::with_builtins();

    let result = registry.from_description(&tokens(&["m", "Magnitude", "later"]), &FeatureMap::new());

    assert!(matches!(result, Err(FeatureError::Range(ref msg)) if msg.contains("later")));
}

#[test]
fn test_global_registry_has_builtins() {
    let types = featuregraph::registry::global().registered_types();
    assert!(types.contains(&"Magnitude".to_string()));

    let feature = featuregraph::registry::from_description(
        &tokens(&["g", "Input", "2"]),
        &FeatureMap::new(),
    )
    .unwrap();
    assert_eq!(feature.type_tag(), "Input");
}
