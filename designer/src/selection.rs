//! Control selection: which control the property editor is pointed at.
//!
//! `SelectionState` is the two-state machine (`Unselected` / `Selected(id)`).
//! `ControlSelection` wraps it with focus tracking and the buffer of property
//! edits made in the editor but not yet written to the canvas. Checking that
//! a selected id exists on the canvas is the editor's job; this module only
//! records transitions.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde_json::{Map, Value};

use crate::canvas::CanvasState;
use crate::concept::ConceptMap;
use crate::descriptor::ConceptRef;

/// The selection state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing selected; the property editor is empty.
    #[default]
    Unselected,
    /// The control with this id is selected.
    Selected(String),
}

/// What the property editor offers for binding a concept to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptSearch {
    /// Nothing selected, or the selected control does not take a concept.
    NotApplicable,
    /// Searching is allowed, filtered to these comma-separated data types.
    Enabled { data_types: &'static str },
    /// A concept is already bound; re-binding goes through delete + recreate.
    Disabled { bound: ConceptRef },
}

/// Selection, focus, and staged property edits for one editing session.
#[derive(Debug, Clone, Default)]
pub struct ControlSelection {
    state: SelectionState,
    focused: Option<String>,
    staged: Option<(String, Map<String, Value>)>,
}

impl ControlSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Id of the selected control, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Selected(id) => Some(id),
            SelectionState::Unselected => None,
        }
    }

    /// Select `id` from any state. Staged edits for a different control are
    /// dropped.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.staged.as_ref().is_some_and(|(staged_id, _)| *staged_id != id) {
            self.staged = None;
        }
        self.state = SelectionState::Selected(id);
    }

    /// Return to `Unselected` from any state. Staged edits are kept so the
    /// host can still commit them.
    pub fn deselect(&mut self) {
        self.state = SelectionState::Unselected;
    }

    /// A click on the canvas background.
    pub fn background_click(&mut self) {
        self.deselect();
    }

    /// Navigation away from the builder: deselect, blur, and discard any
    /// staged edits so nothing leaks into the next form.
    pub fn teardown(&mut self) {
        self.deselect();
        self.blur();
        self.staged = None;
    }

    /// Mark `id` as focused.
    pub fn focus(&mut self, id: impl Into<String>) {
        self.focused = Some(id.into());
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Id of the focused control, if any.
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Buffer a property edit for the selected control. Returns `false` when
    /// nothing is selected.
    pub fn stage_edit(&mut self, delta: &Map<String, Value>) -> bool {
        let Some(id) = self.selected_id().map(str::to_owned) else {
            return false;
        };
        let (_, buffer) = self.staged.get_or_insert_with(|| (id, Map::new()));
        for (key, value) in delta {
            buffer.insert(key.clone(), value.clone());
        }
        true
    }

    /// Whether edits are waiting to be committed.
    #[must_use]
    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Take the staged edits and the id they belong to.
    pub fn take_staged(&mut self) -> Option<(String, Map<String, Value>)> {
        self.staged.take()
    }

    /// Concept-binding affordance for the current selection.
    #[must_use]
    pub fn concept_search(&self, canvas: &CanvasState, concept_map: &ConceptMap) -> ConceptSearch {
        let Some(descriptor) = self.selected_id().and_then(|id| canvas.get(id)) else {
            return ConceptSearch::NotApplicable;
        };
        let Some(data_types) = canvas
            .resolver()
            .registry()
            .get(&descriptor.control_type)
            .and_then(|definition| definition.concept_data_types)
        else {
            return ConceptSearch::NotApplicable;
        };
        let bound = concept_map
            .get(&descriptor.id)
            .map(crate::concept::Concept::to_ref)
            .or_else(|| descriptor.concept.clone());
        match bound {
            Some(bound) => ConceptSearch::Disabled { bound },
            None => ConceptSearch::Enabled { data_types },
        }
    }
}
