//! Validation errors that block a save or publish.
//!
//! Operations on ids that do not exist are not errors: they are permissive
//! no-ops reported through return values (`false` / `Action::None`).

use crate::consts::CONCEPT_MISSING_MESSAGE;

/// Reasons a form cannot be submitted in its current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A control that captures observations has no bound concept.
    #[error("{}", CONCEPT_MISSING_MESSAGE)]
    ConceptMissing { id: String },

    /// Publishing requires at least one saved control.
    #[error("form has no saved controls to publish")]
    NoResourceControls,

    /// The form is published and has not been opened for editing.
    #[error("form is published; open it for editing first")]
    NotEditable,
}

impl ValidationError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConceptMissing { .. } => "E_CONCEPT_MISSING",
            Self::NoResourceControls => "E_NO_RESOURCE_CONTROLS",
            Self::NotEditable => "E_NOT_EDITABLE",
        }
    }
}
