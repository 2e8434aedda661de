use super::*;

#[test]
fn defaults_register_builtin_controls() {
    let registry = ControlRegistry::with_defaults();
    let types: Vec<&str> = registry.types().collect();
    assert_eq!(types, vec!["label", "obsControl", "obsGroupControl", "section"]);
}

#[test]
fn obs_controls_need_concepts() {
    let registry = ControlRegistry::with_defaults();
    assert!(registry.needs_concept(OBS_CONTROL));
    assert!(registry.needs_concept(OBS_GROUP_CONTROL));
    assert!(!registry.needs_concept(LABEL_CONTROL));
    assert!(!registry.needs_concept("unknown"));
}

#[test]
fn resolve_copies_default_metadata() {
    let resolver = DescriptorResolver::new(Arc::new(ControlRegistry::with_defaults()));
    let descriptor = resolver.resolve(LABEL_CONTROL, "5".into()).unwrap();
    assert_eq!(descriptor.id, "5");
    assert_eq!(descriptor.control_type, "label");
    assert_eq!(descriptor.property("value"), Some(&json!("Label")));
    assert!(descriptor.concept.is_none());
}

#[test]
fn resolve_unknown_type_is_none() {
    let resolver = DescriptorResolver::new(Arc::new(ControlRegistry::with_defaults()));
    assert!(resolver.resolve("video", "1".into()).is_none());
}

#[test]
fn register_replaces_existing_definition() {
    let mut registry = ControlRegistry::new();
    registry.register(ControlDefinition {
        control_type: "text".into(),
        label: "Text".into(),
        concept_data_types: None,
        default_metadata: Map::new(),
    });
    registry.register(ControlDefinition {
        control_type: "text".into(),
        label: "Free Text".into(),
        concept_data_types: Some("Text"),
        default_metadata: Map::new(),
    });
    assert_eq!(registry.get("text").map(|d| d.label.as_str()), Some("Free Text"));
    assert!(registry.needs_concept("text"));
}
