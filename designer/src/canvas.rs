//! Canvas state: the ordered list of placed controls.
//!
//! Placement order is the serialization order. Ids are unique within a
//! canvas; they come from [`next_id`] at placement and are never rewritten
//! afterwards, except that [`CanvasState::load`] renumbers duplicates found in
//! a saved form.

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::concept::{Concept, ConceptMap};
use crate::consts::DISPLAY_TYPE_KEY;
use crate::descriptor::ControlDescriptor;
use crate::error::ValidationError;
use crate::ids::next_id;
use crate::registry::DescriptorResolver;

/// Ordered store of placed control descriptors.
#[derive(Debug, Clone)]
pub struct CanvasState {
    resolver: DescriptorResolver,
    descriptors: Vec<ControlDescriptor>,
}

impl CanvasState {
    /// Create an empty canvas that resolves types through `resolver`.
    #[must_use]
    pub fn new(resolver: DescriptorResolver) -> Self {
        Self { resolver, descriptors: Vec::new() }
    }

    /// Place a new control of `control_type` at the end of the canvas.
    ///
    /// Returns `None` and leaves the canvas untouched when the type is not
    /// registered.
    pub fn place(&mut self, control_type: &str) -> Option<&ControlDescriptor> {
        let id = next_id(self.ids());
        let descriptor = self.resolver.resolve(control_type, id)?;
        self.descriptors.push(descriptor);
        self.descriptors.last()
    }

    /// Attach `concept` to the control with `id`, replacing any previous
    /// binding. Returns `false` if no such control exists.
    pub fn bind_concept(&mut self, id: &str, concept: &Concept) -> bool {
        let Some(descriptor) = self.get_mut(id) else {
            return false;
        };
        descriptor.concept = Some(concept.to_ref());
        descriptor
            .metadata
            .insert(DISPLAY_TYPE_KEY.to_owned(), Value::String(concept.datatype_name().to_owned()));
        true
    }

    /// Shallow-merge `delta` into the metadata of the control with `id`.
    /// Returns `false` if no such control exists.
    pub fn update_property(&mut self, id: &str, delta: &Map<String, Value>) -> bool {
        let Some(descriptor) = self.get_mut(id) else {
            return false;
        };
        descriptor.merge_metadata(delta);
        true
    }

    /// Re-apply every binding in `map` to the controls currently on the
    /// canvas. Entries for ids that are not on the canvas are skipped.
    pub fn reconcile_with_concept_map(&mut self, map: &ConceptMap) {
        for (id, concept) in map {
            self.bind_concept(id, concept);
        }
    }

    /// The controls in placement order, ready for submission.
    #[must_use]
    pub fn serialize(&self) -> Vec<ControlDescriptor> {
        self.descriptors.clone()
    }

    /// Replace the canvas with controls from a saved form. The first control
    /// with a given id keeps it; later duplicates get an id that appears
    /// nowhere in `controls`.
    pub fn load(&mut self, controls: Vec<ControlDescriptor>) {
        let mut taken: HashSet<String> = controls.iter().map(|c| c.id.clone()).collect();
        let mut seen = HashSet::new();
        self.descriptors.clear();
        for mut control in controls {
            if !seen.insert(control.id.clone()) {
                control.id = next_id(taken.iter().map(String::as_str));
                taken.insert(control.id.clone());
            }
            self.descriptors.push(control);
        }
    }

    /// Remove the control with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<ControlDescriptor> {
        let index = self.descriptors.iter().position(|d| d.id == id)?;
        Some(self.descriptors.remove(index))
    }

    /// Return a control by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ControlDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut ControlDescriptor> {
        self.descriptors.iter_mut().find(|d| d.id == id)
    }

    /// Whether a control with `id` is on the canvas.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ids in placement order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.id.as_str())
    }

    /// Controls in placement order.
    #[must_use]
    pub fn descriptors(&self) -> &[ControlDescriptor] {
        &self.descriptors
    }

    /// Ids of controls whose type needs a concept but has none bound.
    #[must_use]
    pub fn missing_concepts(&self) -> Vec<&str> {
        let registry = self.resolver.registry();
        self.descriptors
            .iter()
            .filter(|d| d.concept.is_none() && registry.needs_concept(&d.control_type))
            .map(|d| d.id.as_str())
            .collect()
    }

    /// Fail with the first control that still needs a concept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ConceptMissing`] naming the first unbound
    /// observation control in placement order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.missing_concepts().first() {
            Some(id) => Err(ValidationError::ConceptMissing { id: (*id).to_owned() }),
            None => Ok(()),
        }
    }

    /// The resolver this canvas places controls with.
    #[must_use]
    pub fn resolver(&self) -> &DescriptorResolver {
        &self.resolver
    }

    /// Number of controls on the canvas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
