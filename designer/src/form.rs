//! Form definitions and the rules for saving, publishing, and editing them.
//!
//! DESIGN
//! ======
//! A form's controls are stored server-side as a single free-text resource
//! whose value is the JSON `{ id, uuid, controls }`. `editable` is a
//! client-only flag: opening a published form for editing sets it and clears
//! `version`, which tells the backend to mint a new version on the next
//! save. It is never serialized.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::descriptor::ControlDescriptor;
use crate::error::ValidationError;

/// Datatype recorded on form resources holding control JSON.
pub const FORM_RESOURCE_DATA_TYPE: &str = "org.openmrs.customdatatype.datatype.FreeTextDatatype";

// =============================================================================
// WIRE TYPES
// =============================================================================

/// A row of the form list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_info: Option<Value>,
}

/// Name and version of a form, as used by the translation screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInfo {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,
}

/// A stored resource attached to a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub uuid: String,
}

/// The JSON document stored in a form resource's `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormJson {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub controls: Vec<ControlDescriptor>,
}

/// `{ name, uuid }` identifying the form a resource belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRef {
    pub name: String,
    pub uuid: String,
}

/// Body of the save-form-resource request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveFormResource {
    pub form: FormRef,
    /// Control JSON, serialized to a string.
    pub value: String,
    /// Existing resource uuid, or empty for a new resource.
    pub uuid: String,
}

/// Response of the save-form-resource request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFormResource {
    pub form: FormDefinition,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub uuid: String,
}

/// Body of the rename request sent before saving a renamed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRenameRequest {
    pub name: String,
    pub version: String,
    pub published: bool,
}

/// Response of the publish request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedForm {
    #[serde(default)]
    pub published: bool,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,
}

// =============================================================================
// FORM DEFINITION
// =============================================================================

/// Which header actions are available for a form.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormActions {
    pub show_save: bool,
    pub show_publish: bool,
    pub publish_enabled: bool,
    pub show_edit: bool,
}

/// A form as loaded from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(default)]
    pub published: bool,
    /// Set when a published form is opened for editing. Client-only.
    #[serde(skip)]
    pub editable: bool,
    #[serde(default)]
    pub resources: Vec<FormResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_info: Option<Value>,
}

impl FormDefinition {
    /// Build the form from a save response, attaching the saved resource.
    #[must_use]
    pub fn from_saved(saved: SavedFormResource) -> Self {
        let mut form = saved.form;
        form.resources = vec![FormResource {
            name: Some(form.name.clone()),
            data_type: saved.data_type,
            value: saved.value,
            uuid: saved.uuid,
        }];
        form
    }

    /// Controls stored in the first resource. A missing or unparsable
    /// resource yields no controls.
    #[must_use]
    pub fn resource_controls(&self) -> Vec<ControlDescriptor> {
        let Some(resource) = self.resources.first() else {
            return Vec::new();
        };
        serde_json::from_str::<FormJson>(&resource.value)
            .map(|json| json.controls)
            .unwrap_or_default()
    }

    /// Uuid of the first resource, or empty when none is saved yet.
    #[must_use]
    pub fn resource_uuid(&self) -> &str {
        self.resources.first().map_or("", |r| r.uuid.as_str())
    }

    /// Published and not opened for editing.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.published && !self.editable
    }

    /// Header actions once the form has been `received` from the backend.
    #[must_use]
    pub fn actions(&self, received: bool) -> FormActions {
        if !received {
            return FormActions::default();
        }
        let writable = !self.is_read_only();
        FormActions {
            show_save: writable,
            show_publish: writable,
            publish_enabled: writable && !self.resource_controls().is_empty(),
            show_edit: !writable,
        }
    }

    /// Open a published form for editing; the next save creates a new version.
    pub fn enter_edit_mode(&mut self) {
        self.editable = true;
        self.version.clear();
    }

    /// Record the outcome of a publish.
    pub fn apply_publish(&mut self, published: PublishedForm) {
        self.published = published.published;
        self.version = published.version;
    }

    /// Check the form can be published.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotEditable`] for read-only forms and
    /// [`ValidationError::NoResourceControls`] when nothing has been saved.
    pub fn validate_publish(&self) -> Result<(), ValidationError> {
        if self.is_read_only() {
            return Err(ValidationError::NotEditable);
        }
        if self.resource_controls().is_empty() {
            return Err(ValidationError::NoResourceControls);
        }
        Ok(())
    }

    /// Build the save request carrying `controls`.
    ///
    /// # Errors
    ///
    /// Returns an error if the controls cannot be serialized.
    pub fn save_payload(&self, controls: &[ControlDescriptor]) -> Result<SaveFormResource, serde_json::Error> {
        let json = FormJson { id: self.uuid.clone(), uuid: self.uuid.clone(), controls: controls.to_vec() };
        Ok(SaveFormResource {
            form: FormRef { name: self.name.clone(), uuid: self.uuid.clone() },
            value: serde_json::to_string(&json)?,
            uuid: self.resource_uuid().to_owned(),
        })
    }

    /// Body of the rename request for this form's current name.
    #[must_use]
    pub fn rename_request(&self) -> FormRenameRequest {
        FormRenameRequest { name: self.name.clone(), version: self.version.clone(), published: self.published }
    }
}

/// Accept versions sent either as `"2"` or `2`; `null` becomes empty.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
