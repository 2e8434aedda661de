//! Editing core for the observation form builder.
//!
//! This crate owns everything that happens between a user dropping a control
//! on the canvas and the form definition being handed to the backend: id
//! assignment, descriptor resolution against an injected control registry,
//! the ordered canvas, the selection state machine, concept binding, and the
//! multi-locale translation store. It performs no I/O; the host drives it and
//! persists the resulting payloads.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Top-level [`editor::EditorCore`] and the [`editor::Action`]s it emits |
//! | [`canvas`] | Ordered store of placed controls |
//! | [`selection`] | Selection/focus state machine and concept-search affordance |
//! | [`registry`] | Control registry and descriptor resolver |
//! | [`descriptor`] | Placed-control descriptor and bound concept reference |
//! | [`concept`] | Concept model as served by the backend |
//! | [`ids`] | Identifier generator |
//! | [`translations`] | Per-locale translation store and grid presentation |
//! | [`form`] | Form definition, action availability, and save payloads |
//! | [`error`] | Validation errors |
//! | [`consts`] | Control type names, data-type filters, and messages |

pub mod canvas;
pub mod concept;
pub mod consts;
pub mod descriptor;
pub mod editor;
pub mod error;
pub mod form;
pub mod ids;
pub mod registry;
pub mod selection;
pub mod translations;
