//! Form detail screen: the builder for one form.
//!
//! DESIGN
//! ======
//! The session owns the loaded [`FormDefinition`] and the [`EditorCore`]
//! holding its controls. Saving sends the canvas as a new resource value,
//! preceded by a rename request when the name was changed since load.
//! Publishing only looks at what has been saved, not at unsaved canvas
//! edits.
//!
//! A save can move the form to a new uuid (saving a published form mints a
//! new version). The session follows the uuid from the save response.

use std::sync::Arc;

use designer::concept::Concept;
use designer::editor::{Action, EditorCore};
use designer::error::ValidationError;
use designer::form::{
    FormActions, FormDefinition, FormRenameRequest, PublishedForm, SaveFormResource, SavedFormResource,
};
use designer::registry::ControlRegistry;
use designer::selection::ConceptSearch;
use tracing::{debug, info, warn};

use super::SessionError;
use super::concepts::ConceptPicker;
use super::notify::Notifier;
use crate::api::{ApiError, FormApi};

pub const SAVE_SUCCESS_MESSAGE: &str = "Form Saved Successfully";
pub const PUBLISH_SUCCESS_MESSAGE: &str = "Form Published Successfully";

// =============================================================================
// PENDING REQUESTS
// =============================================================================

/// A save that has passed validation and is marked in flight.
#[derive(Debug, Clone)]
pub struct PendingSave {
    form_uuid: String,
    rename: Option<FormRenameRequest>,
    payload: SaveFormResource,
}

impl PendingSave {
    /// Rename first when needed, then save the resource. A failed rename
    /// skips the save.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error.
    pub async fn execute(&self, api: &dyn FormApi) -> Result<SavedFormResource, ApiError> {
        if let Some(rename) = &self.rename {
            api.update_form(&self.form_uuid, rename).await?;
        }
        api.save_form_resource(&self.payload).await
    }
}

/// A publish that has passed validation and is marked in flight.
#[derive(Debug, Clone)]
pub struct PendingPublish {
    form_uuid: String,
}

impl PendingPublish {
    /// # Errors
    ///
    /// Returns the publish request's error.
    pub async fn execute(&self, api: &dyn FormApi) -> Result<PublishedForm, ApiError> {
        api.publish_form(&self.form_uuid).await
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct FormDetailSession {
    api: Arc<dyn FormApi>,
    picker: ConceptPicker,
    form_uuid: String,
    form: Option<FormDefinition>,
    /// Name as last loaded or saved; a different current name means rename.
    origin_name: String,
    editor: EditorCore,
    notifier: Notifier,
    in_flight: bool,
    mounted: bool,
}

impl FormDetailSession {
    #[must_use]
    pub fn new(
        api: Arc<dyn FormApi>,
        registry: Arc<ControlRegistry>,
        form_uuid: impl Into<String>,
        notifier: Notifier,
    ) -> Self {
        Self {
            picker: ConceptPicker::new(Arc::clone(&api)),
            api,
            form_uuid: form_uuid.into(),
            form: None,
            origin_name: String::new(),
            editor: EditorCore::new(registry),
            notifier,
            in_flight: false,
            mounted: true,
        }
    }

    // --- Loading ---

    /// Fetch the form and put its saved controls on the canvas.
    ///
    /// # Errors
    ///
    /// [`SessionError::Network`] if the fetch fails, [`SessionError::Unmounted`]
    /// after `unmount`.
    pub async fn load(&mut self) -> Result<&FormDefinition, SessionError> {
        self.ensure_mounted()?;
        let fetched = self.api.fetch_form(&self.form_uuid).await;
        let form = match fetched {
            Ok(form) => form,
            Err(e) => {
                warn!(form = %self.form_uuid, error = %e, "form fetch failed");
                return Err(self.report(SessionError::network(e)));
            }
        };
        info!(form = %form.uuid, name = %form.name, published = form.published, "form loaded");
        self.editor.load_controls(form.resource_controls());
        self.origin_name.clone_from(&form.name);
        Ok(self.form.insert(form))
    }

    #[must_use]
    pub fn form(&self) -> Option<&FormDefinition> {
        self.form.as_ref()
    }

    #[must_use]
    pub fn form_uuid(&self) -> &str {
        &self.form_uuid
    }

    /// Header actions; everything is hidden until the form has been received.
    #[must_use]
    pub fn actions(&self) -> FormActions {
        self.form.as_ref().map(|f| f.actions(true)).unwrap_or_default()
    }

    // --- Editing ---

    #[must_use]
    pub fn editor(&self) -> &EditorCore {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorCore {
        &mut self.editor
    }

    /// Open a published form for editing. Returns `false` when the form is
    /// not loaded or already writable.
    pub fn enter_edit_mode(&mut self) -> bool {
        let Some(form) = self.form.as_mut().filter(|f| f.is_read_only()) else {
            return false;
        };
        form.enter_edit_mode();
        self.editor.teardown();
        info!(form = %form.uuid, "edit mode");
        true
    }

    /// Change the form name locally; it is sent with the next save.
    pub fn rename(&mut self, name: &str) -> bool {
        let name = name.trim();
        match self.form.as_mut() {
            Some(form) if !form.is_read_only() && !name.is_empty() => {
                name.clone_into(&mut form.name);
                true
            }
            _ => false,
        }
    }

    /// Concepts matching `query` for the selected control.
    ///
    /// # Errors
    ///
    /// [`SessionError::Network`] if the search fails.
    pub async fn search_concepts(&mut self, query: &str) -> Result<Vec<Concept>, SessionError> {
        let affordance = self.editor.concept_search();
        let found = self.picker.search(&affordance, query).await;
        found.map_err(|err| self.report(err))
    }

    /// Resolve the concept named `name` and bind it to the selected control.
    /// Nothing is requested unless the selection accepts a concept.
    ///
    /// # Errors
    ///
    /// [`SessionError::Network`] if the lookup fails.
    pub async fn pick_concept(&mut self, name: &str) -> Result<Action, SessionError> {
        self.ensure_mounted()?;
        if !matches!(self.editor.concept_search(), ConceptSearch::Enabled { .. }) {
            debug!(name, "concept pick ignored");
            return Ok(Action::None);
        }
        let resolved = self.picker.resolve(name).await;
        match resolved {
            Ok(Some(concept)) => Ok(self.editor.bind_selected_concept(concept)),
            Ok(None) => {
                debug!(name, "concept not found");
                Ok(Action::None)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    // --- Save ---

    /// Validate the canvas and mark a save in flight.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while another submit is pending,
    /// [`SessionError::NotLoaded`], [`SessionError::Validation`] when the form
    /// is read-only or a control lacks its concept.
    pub fn begin_save(&mut self) -> Result<PendingSave, SessionError> {
        self.ensure_mounted()?;
        if self.in_flight {
            return Err(SessionError::Busy);
        }
        if self.form.is_none() {
            return Err(SessionError::NotLoaded);
        }
        let pending = self.prepare_save().map_err(|e| self.report(e))?;
        self.in_flight = true;
        Ok(pending)
    }

    fn prepare_save(&self) -> Result<PendingSave, SessionError> {
        let form = self.form.as_ref().ok_or(SessionError::NotLoaded)?;
        if form.is_read_only() {
            return Err(ValidationError::NotEditable.into());
        }
        self.editor.validate()?;
        let payload =
            form.save_payload(&self.editor.serialize()).map_err(|e| SessionError::Serialize(e.to_string()))?;
        let rename = (form.name != self.origin_name).then(|| form.rename_request());
        Ok(PendingSave { form_uuid: form.uuid.clone(), rename, payload })
    }

    /// Apply the outcome of a save.
    ///
    /// # Errors
    ///
    /// [`SessionError::Network`] if the save failed, [`SessionError::Unmounted`]
    /// if the session was torn down meanwhile (the outcome is dropped).
    pub fn complete_save(
        &mut self,
        outcome: Result<SavedFormResource, ApiError>,
    ) -> Result<&FormDefinition, SessionError> {
        self.in_flight = false;
        self.ensure_mounted()?;
        match outcome {
            Ok(saved) => {
                let form = FormDefinition::from_saved(saved);
                info!(form = %form.uuid, name = %form.name, "form saved");
                self.form_uuid.clone_from(&form.uuid);
                self.origin_name.clone_from(&form.name);
                self.notifier.success(SAVE_SUCCESS_MESSAGE);
                Ok(self.form.insert(form))
            }
            Err(e) => {
                warn!(form = %self.form_uuid, error = %e, "form save failed");
                Err(self.report(SessionError::network(e)))
            }
        }
    }

    /// Validate, send, and apply a save.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_save`] and [`Self::complete_save`].
    pub async fn save(&mut self) -> Result<&FormDefinition, SessionError> {
        let pending = self.begin_save()?;
        let api = Arc::clone(&self.api);
        let outcome = pending.execute(api.as_ref()).await;
        self.complete_save(outcome)
    }

    // --- Publish ---

    /// Check the saved form can be published and mark it in flight.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`], [`SessionError::NotLoaded`], or
    /// [`SessionError::Validation`] when the form is read-only or nothing
    /// has been saved.
    pub fn begin_publish(&mut self) -> Result<PendingPublish, SessionError> {
        self.ensure_mounted()?;
        if self.in_flight {
            return Err(SessionError::Busy);
        }
        let Some(form) = self.form.as_ref() else {
            return Err(SessionError::NotLoaded);
        };
        let checked = form.validate_publish().map(|()| PendingPublish { form_uuid: form.uuid.clone() });
        let pending = checked.map_err(|e| self.report(e.into()))?;
        self.in_flight = true;
        Ok(pending)
    }

    /// Apply the outcome of a publish.
    ///
    /// # Errors
    ///
    /// [`SessionError::Network`] if the publish failed, [`SessionError::Unmounted`]
    /// if the session was torn down meanwhile, [`SessionError::NotLoaded`] if
    /// the form is gone.
    pub fn complete_publish(
        &mut self,
        outcome: Result<PublishedForm, ApiError>,
    ) -> Result<&FormDefinition, SessionError> {
        self.in_flight = false;
        self.ensure_mounted()?;
        match outcome {
            Ok(published) => {
                let form = self.form.as_mut().ok_or(SessionError::NotLoaded)?;
                form.apply_publish(published);
                info!(form = %form.uuid, version = %form.version, "form published");
                self.notifier.success(PUBLISH_SUCCESS_MESSAGE);
                self.form.as_ref().ok_or(SessionError::NotLoaded)
            }
            Err(e) => {
                warn!(form = %self.form_uuid, error = %e, "form publish failed");
                Err(self.report(SessionError::network(e)))
            }
        }
    }

    /// Validate, send, and apply a publish.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_publish`] and [`Self::complete_publish`].
    pub async fn publish(&mut self) -> Result<&FormDefinition, SessionError> {
        let pending = self.begin_publish()?;
        let api = Arc::clone(&self.api);
        let outcome = pending.execute(api.as_ref()).await;
        self.complete_publish(outcome)
    }

    // --- Lifecycle ---

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Navigate away: stop the notification timer, drop transient editor
    /// state, and ignore any completion that arrives later.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.notifier.cancel();
        self.editor.teardown();
    }

    fn ensure_mounted(&self) -> Result<(), SessionError> {
        if self.mounted { Ok(()) } else { Err(SessionError::Unmounted) }
    }

    fn report(&mut self, err: SessionError) -> SessionError {
        self.notifier.error(err.to_string());
        err
    }
}

#[cfg(test)]
#[path = "form_detail_test.rs"]
mod tests;
