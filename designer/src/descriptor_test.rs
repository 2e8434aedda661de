use serde_json::json;

use super::*;

fn obj(value: serde_json::Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn serializes_flat() {
    let mut descriptor = ControlDescriptor::new("1".into(), "obsControl".into(), obj(json!({ "label": "Pulse" })));
    descriptor.concept = Some(ConceptRef { name: "Pulse".into(), uuid: "p-1".into() });
    let value = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "1",
            "type": "obsControl",
            "concept": { "name": "Pulse", "uuid": "p-1" },
            "label": "Pulse"
        })
    );
}

#[test]
fn deserializes_extra_keys_into_metadata() {
    let descriptor: ControlDescriptor = serde_json::from_value(json!({
        "id": "4",
        "type": "label",
        "value": "Vitals",
        "properties": { "location": { "row": 0, "column": 1 } }
    }))
    .unwrap();
    assert_eq!(descriptor.id, "4");
    assert_eq!(descriptor.control_type, "label");
    assert!(descriptor.concept.is_none());
    assert_eq!(descriptor.property("value"), Some(&json!("Vitals")));
    assert!(descriptor.metadata.contains_key("properties"));
    assert!(!descriptor.metadata.contains_key("id"));
}

#[test]
fn merge_is_shallow() {
    let mut descriptor = ControlDescriptor::new(
        "1".into(),
        "obsControl".into(),
        obj(json!({ "properties": { "mandatory": false, "notes": true }, "label": "A" })),
    );
    descriptor.merge_metadata(&obj(json!({ "properties": { "mandatory": true } })));
    assert_eq!(descriptor.property("properties"), Some(&json!({ "mandatory": true })));
    assert_eq!(descriptor.property("label"), Some(&json!("A")));
}

#[test]
fn merge_ignores_reserved_keys() {
    let mut descriptor = ControlDescriptor::new("1".into(), "obsControl".into(), Map::new());
    descriptor.merge_metadata(&obj(json!({ "id": "99", "type": "label", "concept": {}, "x": 1 })));
    assert_eq!(descriptor.id, "1");
    assert_eq!(descriptor.control_type, "obsControl");
    assert!(descriptor.concept.is_none());
    assert_eq!(descriptor.metadata.len(), 1);
}

#[test]
fn display_type_reads_metadata() {
    let descriptor = ControlDescriptor::new("1".into(), "obsControl".into(), obj(json!({ "displayType": "Numeric" })));
    assert_eq!(descriptor.display_type(), Some("Numeric"));
}
