//! Concept model: clinical data-point definitions bound to observation controls.
//!
//! Concepts arrive from the backend's concept endpoints in OpenMRS's
//! camelCase representation and are read-only afterwards. Controls never own
//! a concept; they keep a [`ConceptRef`](crate::descriptor::ConceptRef) and the
//! editor keeps the full concept in its concept-to-control map.

#[cfg(test)]
#[path = "concept_test.rs"]
mod concept_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::ConceptRef;

/// Concepts keyed by the id of the control they are bound to.
pub type ConceptMap = BTreeMap<String, Concept>;

/// A `{ uuid, name }` pair used for concept classes and datatypes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub uuid: String,
    pub name: String,
}

/// The fully specified name of a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptName {
    #[serde(default)]
    pub uuid: String,
    pub name: String,
}

/// A concept as returned by the concept search and lookup endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub uuid: String,
    /// Display label; the lookup path fills it from the fully specified name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub name: ConceptName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_class: Option<NamedRef>,
    pub datatype: NamedRef,
    /// Whether this concept is a set (grouped concept).
    #[serde(default)]
    pub set: bool,
    #[serde(default)]
    pub set_members: Vec<Concept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_decimal: Option<bool>,
}

impl Concept {
    /// The label shown to users: `display` when present, else the name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name.name)
    }

    /// Name of the concept's datatype (e.g. `"Numeric"`).
    #[must_use]
    pub fn datatype_name(&self) -> &str {
        &self.datatype.name
    }

    /// The reference stored on a control bound to this concept.
    #[must_use]
    pub fn to_ref(&self) -> ConceptRef {
        ConceptRef { name: self.name.name.clone(), uuid: self.uuid.clone() }
    }

    /// Whether this concept groups other concepts.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.set || !self.set_members.is_empty()
    }

    /// All non-set descendants in depth-first order.
    #[must_use]
    pub fn leaf_members(&self) -> Vec<&Concept> {
        let mut out = Vec::new();
        for member in &self.set_members {
            if member.is_set() {
                out.extend(member.leaf_members());
            } else {
                out.push(member);
            }
        }
        out
    }
}
