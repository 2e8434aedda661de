//! Control registry and descriptor resolver.
//!
//! DESIGN
//! ======
//! The registry is an explicit value handed to the resolver (and through it
//! to the canvas), never a process-wide lookup. Hosts build one at startup,
//! wrap it in an `Arc`, and share it between every editing session.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::consts::{
    LABEL_CONTROL, OBS_CONTROL, OBS_GROUP_CONTROL, SECTION_CONTROL, SUPPORTED_OBS_DATA_TYPES,
    SUPPORTED_OBS_GROUP_DATA_TYPES,
};
use crate::descriptor::ControlDescriptor;

/// What the registry knows about one control type.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDefinition {
    /// Type name used on the wire and in drag payloads.
    pub control_type: String,
    /// Human-readable name for palettes.
    pub label: String,
    /// Concept data types offered when binding, or `None` when the control
    /// does not capture observations.
    pub concept_data_types: Option<&'static str>,
    /// Metadata copied into every new descriptor of this type.
    pub default_metadata: Map<String, Value>,
}

impl ControlDefinition {
    /// Whether controls of this type must be bound to a concept before saving.
    #[must_use]
    pub fn needs_concept(&self) -> bool {
        self.concept_data_types.is_some()
    }
}

/// Registered control types, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    definitions: BTreeMap<String, ControlDefinition>,
}

impl ControlRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in observation, group, label, and section controls.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ControlDefinition {
            control_type: OBS_CONTROL.to_owned(),
            label: "Obs".to_owned(),
            concept_data_types: Some(SUPPORTED_OBS_DATA_TYPES),
            default_metadata: object(json!({
                "label": { "type": "label", "value": "" },
                "properties": { "mandatory": false, "notes": false, "addMore": false, "hideLabel": false },
            })),
        });
        registry.register(ControlDefinition {
            control_type: OBS_GROUP_CONTROL.to_owned(),
            label: "Obs Group".to_owned(),
            concept_data_types: Some(SUPPORTED_OBS_GROUP_DATA_TYPES),
            default_metadata: object(json!({
                "label": { "type": "label", "value": "" },
                "properties": { "addMore": false },
                "controls": [],
            })),
        });
        registry.register(ControlDefinition {
            control_type: LABEL_CONTROL.to_owned(),
            label: "Label".to_owned(),
            concept_data_types: None,
            default_metadata: object(json!({ "value": "Label" })),
        });
        registry.register(ControlDefinition {
            control_type: SECTION_CONTROL.to_owned(),
            label: "Section".to_owned(),
            concept_data_types: None,
            default_metadata: object(json!({
                "label": { "type": "label", "value": "Section" },
                "controls": [],
            })),
        });
        registry
    }

    /// Add or replace a control definition.
    pub fn register(&mut self, definition: ControlDefinition) {
        self.definitions.insert(definition.control_type.clone(), definition);
    }

    /// Look up a definition by type name.
    #[must_use]
    pub fn get(&self, control_type: &str) -> Option<&ControlDefinition> {
        self.definitions.get(control_type)
    }

    /// Whether `control_type` is registered and needs a concept binding.
    #[must_use]
    pub fn needs_concept(&self, control_type: &str) -> bool {
        self.get(control_type).is_some_and(ControlDefinition::needs_concept)
    }

    /// Registered type names in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

/// Resolves a dropped control type into a fresh descriptor.
#[derive(Debug, Clone)]
pub struct DescriptorResolver {
    registry: Arc<ControlRegistry>,
}

impl DescriptorResolver {
    #[must_use]
    pub fn new(registry: Arc<ControlRegistry>) -> Self {
        Self { registry }
    }

    /// Build a descriptor for `control_type` with the given id and the type's
    /// default metadata. Returns `None` for unregistered types.
    #[must_use]
    pub fn resolve(&self, control_type: &str, id: String) -> Option<ControlDescriptor> {
        let definition = self.registry.get(control_type)?;
        Some(ControlDescriptor::new(id, definition.control_type.clone(), definition.default_metadata.clone()))
    }

    /// The registry this resolver reads from.
    #[must_use]
    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
