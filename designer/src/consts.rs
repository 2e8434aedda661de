//! Shared constants for the designer crate.

// ── Control types ───────────────────────────────────────────────

/// Control that captures a single observation.
pub const OBS_CONTROL: &str = "obsControl";

/// Control that groups several observations under a set concept.
pub const OBS_GROUP_CONTROL: &str = "obsGroupControl";

/// Static text label.
pub const LABEL_CONTROL: &str = "label";

/// Layout section containing other controls.
pub const SECTION_CONTROL: &str = "section";

// ── Concept search ──────────────────────────────────────────────

/// Concept data types offered when binding an observation control.
pub const SUPPORTED_OBS_DATA_TYPES: &str = "Boolean,Text,Numeric,N/A";

/// Concept data types offered when binding an observation group.
pub const SUPPORTED_OBS_GROUP_DATA_TYPES: &str = "N/A";

// ── Metadata keys ───────────────────────────────────────────────

/// Metadata key holding the bound concept's datatype name.
pub const DISPLAY_TYPE_KEY: &str = "displayType";

/// Metadata key holding control event scripts.
pub const EVENTS_KEY: &str = "events";

/// Event name for the script run when a control's value changes.
pub const ON_VALUE_CHANGE_EVENT: &str = "onValueChange";

/// Descriptor fields that live outside the metadata bag.
pub const RESERVED_KEYS: [&str; 3] = ["id", "type", "concept"];

// ── Messages ────────────────────────────────────────────────────

/// Shown when an observation control is saved without a concept.
pub const CONCEPT_MISSING_MESSAGE: &str = "Please associate Concept to Obs";

/// First header of the translation grid.
pub const TRANSLATION_KEY_HEADER: &str = "Translation Key";
