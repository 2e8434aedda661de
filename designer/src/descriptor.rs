//! Placed-control descriptors.
//!
//! A descriptor pairs a control's type with its open-ended metadata bag. On
//! the wire it is a single flat JSON object: `id`, `type`, and `concept` are
//! typed fields, every other key lives in `metadata`.

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod descriptor_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{DISPLAY_TYPE_KEY, RESERVED_KEYS};

/// Reference to the concept bound to a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRef {
    pub name: String,
    pub uuid: String,
}

/// A control placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDescriptor {
    /// Canvas-unique id, assigned at placement and never changed.
    pub id: String,
    /// Registered control type (e.g. `"obsControl"`).
    #[serde(rename = "type")]
    pub control_type: String,
    /// Bound concept, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<ConceptRef>,
    /// Remaining per-control properties.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ControlDescriptor {
    /// Create a descriptor with the given metadata. Reserved keys in
    /// `metadata` are dropped.
    #[must_use]
    pub fn new(id: String, control_type: String, metadata: Map<String, Value>) -> Self {
        let mut descriptor = Self { id, control_type, concept: None, metadata: Map::new() };
        descriptor.merge_metadata(&metadata);
        descriptor
    }

    /// Shallow-merge `delta` into the metadata. Top-level keys replace
    /// existing ones; `id`, `type`, and `concept` are ignored.
    pub fn merge_metadata(&mut self, delta: &Map<String, Value>) {
        for (key, value) in delta {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.metadata.insert(key.clone(), value.clone());
        }
    }

    /// Datatype name of the bound concept, recorded at bind time.
    #[must_use]
    pub fn display_type(&self) -> Option<&str> {
        self.metadata.get(DISPLAY_TYPE_KEY).and_then(Value::as_str)
    }

    /// Look up a single metadata value.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}
