use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::canvas::CanvasState;
use crate::concept::{Concept, ConceptMap};
use crate::consts::{EVENTS_KEY, ON_VALUE_CHANGE_EVENT};
use crate::descriptor::ControlDescriptor;
use crate::error::ValidationError;
use crate::registry::{ControlRegistry, DescriptorResolver};
use crate::selection::{ConceptSearch, ControlSelection};

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

/// Changes reported to the host after each editor operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    ControlPlaced(ControlDescriptor),
    ControlUpdated { id: String },
    ControlRemoved { id: String },
    SelectionChanged(Option<String>),
}

/// Payload carried by a palette drag.
#[derive(Debug, Deserialize)]
struct DragPayload {
    #[serde(rename = "type")]
    control_type: String,
}

/// Editing state for one form: canvas, selection, and concept bindings.
///
/// Owned by a single session; the host forwards user events here and
/// re-renders from the returned [`Action`].
#[derive(Debug, Clone)]
pub struct EditorCore {
    canvas: CanvasState,
    selection: ControlSelection,
    concept_map: ConceptMap,
}

impl EditorCore {
    #[must_use]
    pub fn new(registry: Arc<ControlRegistry>) -> Self {
        Self {
            canvas: CanvasState::new(DescriptorResolver::new(registry)),
            selection: ControlSelection::new(),
            concept_map: ConceptMap::new(),
        }
    }

    // --- Data inputs ---

    /// Hydrate the canvas from a saved form. Resets selection and bindings.
    pub fn load_controls(&mut self, controls: Vec<ControlDescriptor>) {
        self.teardown();
        self.canvas.load(controls);
    }

    /// Handle a drop carrying a JSON drag payload (`{"type": "..."}`).
    pub fn drop_payload(&mut self, data: &str) -> Action {
        match serde_json::from_str::<DragPayload>(data) {
            Ok(payload) => self.place(&payload.control_type),
            Err(_) => Action::None,
        }
    }

    /// Place a control of `control_type`.
    pub fn place(&mut self, control_type: &str) -> Action {
        match self.canvas.place(control_type) {
            Some(descriptor) => Action::ControlPlaced(descriptor.clone()),
            None => Action::None,
        }
    }

    /// Remove a control, its binding, and the selection if it pointed there.
    pub fn remove(&mut self, id: &str) -> Action {
        if self.canvas.remove(id).is_none() {
            return Action::None;
        }
        self.concept_map.remove(id);
        if self.selection.selected_id() == Some(id) {
            self.selection.teardown();
        } else if self.selection.focused() == Some(id) {
            self.selection.blur();
        }
        Action::ControlRemoved { id: id.to_owned() }
    }

    // --- Selection ---

    /// Select a control. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> Action {
        if !self.canvas.contains(id) {
            return Action::None;
        }
        self.selection.select(id);
        Action::SelectionChanged(Some(id.to_owned()))
    }

    /// Click on the canvas background.
    pub fn background_click(&mut self) -> Action {
        if self.selection.selected_id().is_none() {
            return Action::None;
        }
        self.selection.background_click();
        Action::SelectionChanged(None)
    }

    /// Track keyboard focus on a control. Returns `false` for unknown ids.
    pub fn focus(&mut self, id: &str) -> bool {
        if !self.canvas.contains(id) {
            return false;
        }
        self.selection.focus(id);
        true
    }

    pub fn blur(&mut self) {
        self.selection.blur();
    }

    /// Navigation away from the builder: drop selection, focus, staged
    /// edits, and concept bindings made in this session.
    pub fn teardown(&mut self) {
        self.selection.teardown();
        self.concept_map.clear();
    }

    /// The concept-binding affordance for the current selection.
    #[must_use]
    pub fn concept_search(&self) -> ConceptSearch {
        self.selection.concept_search(&self.canvas, &self.concept_map)
    }

    // --- Properties ---

    /// Merge `delta` into a control's metadata.
    pub fn update_property(&mut self, id: &str, delta: &Map<String, Value>) -> Action {
        if self.canvas.update_property(id, delta) {
            Action::ControlUpdated { id: id.to_owned() }
        } else {
            Action::None
        }
    }

    /// Buffer an edit for the selected control without applying it.
    pub fn stage_edit(&mut self, delta: &Map<String, Value>) -> bool {
        self.selection.stage_edit(delta)
    }

    /// Apply buffered edits to the control they were made for.
    pub fn commit_staged(&mut self) -> Action {
        match self.selection.take_staged() {
            Some((id, delta)) => self.update_property(&id, &delta),
            None => Action::None,
        }
    }

    /// Set the value-change script of the selected control.
    pub fn set_selected_script(&mut self, script: &str) -> Action {
        let Some(id) = self.selection.selected_id().map(str::to_owned) else {
            return Action::None;
        };
        let mut events = self
            .canvas
            .get(&id)
            .and_then(|d| d.property(EVENTS_KEY))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        events.insert(ON_VALUE_CHANGE_EVENT.to_owned(), Value::String(script.to_owned()));
        let mut delta = Map::new();
        delta.insert(EVENTS_KEY.to_owned(), json!(events));
        self.update_property(&id, &delta)
    }

    // --- Concepts ---

    /// Bind `concept` to the selected control. Refused when nothing is
    /// selected, the control takes no concept, or one is already bound.
    pub fn bind_selected_concept(&mut self, concept: Concept) -> Action {
        if !matches!(self.concept_search(), ConceptSearch::Enabled { .. }) {
            return Action::None;
        }
        let Some(id) = self.selection.selected_id().map(str::to_owned) else {
            return Action::None;
        };
        self.concept_map.insert(id.clone(), concept);
        self.canvas.reconcile_with_concept_map(&self.concept_map);
        Action::ControlUpdated { id }
    }

    /// Replace the concept-to-control map and re-apply it to the canvas.
    pub fn set_concept_map(&mut self, map: ConceptMap) {
        self.concept_map = map;
        self.canvas.reconcile_with_concept_map(&self.concept_map);
    }

    /// Placed controls. Mutations go through the editor so the selection
    /// never points at a removed control.
    #[must_use]
    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    #[must_use]
    pub fn selection(&self) -> &ControlSelection {
        &self.selection
    }

    /// Concepts bound in this session, keyed by control id.
    #[must_use]
    pub fn concept_map(&self) -> &ConceptMap {
        &self.concept_map
    }

    // --- Output ---

    /// Check every observation control has a concept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ConceptMissing`] for the first unbound control.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.canvas.validate()
    }

    /// Controls in placement order.
    #[must_use]
    pub fn serialize(&self) -> Vec<ControlDescriptor> {
        self.canvas.serialize()
    }
}
