//! In-memory [`FormApi`] for session tests.
//!
//! Canned data lives in plain fields; failures can be switched on and off
//! per method while a test runs. Every call is recorded as
//! `(method, detail)` so tests can assert on order and counts.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use designer::concept::{Concept, ConceptName, NamedRef};
use designer::descriptor::ControlDescriptor;
use designer::form::{
    FORM_RESOURCE_DATA_TYPE, FormDefinition, FormInfo, FormJson, FormRenameRequest, FormResource, FormSummary,
    PublishedForm, SaveFormResource, SavedFormResource,
};
use designer::translations::{LocaleTranslations, SaveTranslationPayload};

use super::types::Locale;
use super::{ApiError, FormApi};

pub struct MockApi {
    pub forms: Vec<FormSummary>,
    pub form: FormDefinition,
    pub published: PublishedForm,
    pub concepts: Vec<Concept>,
    pub locales: Vec<Locale>,
    pub translations: BTreeMap<String, LocaleTranslations>,
    failures: Mutex<BTreeMap<&'static str, ApiError>>,
    calls: Mutex<Vec<(&'static str, String)>>,
    pub saved: Mutex<Vec<SaveFormResource>>,
    pub renames: Mutex<Vec<FormRenameRequest>>,
    pub translation_saves: Mutex<Vec<Vec<SaveTranslationPayload>>>,
}

impl Default for MockApi {
    fn default() -> Self {
        let mut translations = BTreeMap::new();
        translations.insert("en".to_owned(), translation_data(&[("PULSE_1", "Pulse")], &[("LABEL_2", "Vitals")]));
        translations.insert("fr".to_owned(), translation_data(&[("PULSE_1", "Pouls")], &[("LABEL_2", "Signes")]));
        Self {
            forms: vec![summary("form-1", "Vitals", false), summary("form-2", "History", true)],
            form: form(false, &[]),
            published: PublishedForm { published: true, version: "2".into() },
            concepts: vec![concept("c-pulse", "Pulse", "Numeric"), concept("c-smoker", "Smoker", "Boolean")],
            locales: vec![
                Locale { code: "en".into(), native_name: "English".into() },
                Locale { code: "fr".into(), native_name: "Français".into() },
            ],
            translations,
            failures: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
            renames: Mutex::new(Vec::new()),
            translation_saves: Mutex::new(Vec::new()),
        }
    }
}

impl MockApi {
    /// Default data, serving `form` from the form endpoints.
    pub fn with_form(form: FormDefinition) -> Self {
        Self { form, ..Self::default() }
    }

    /// Make every later call to `method` fail with `error`.
    pub fn fail(&self, method: &'static str, error: ApiError) {
        self.failures.lock().unwrap().insert(method, error);
    }

    pub fn heal(&self, method: &'static str) {
        self.failures.lock().unwrap().remove(method);
    }

    /// Number of calls made to `method`.
    pub fn count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(m, _)| *m == method).count()
    }

    /// Methods called, in order.
    pub fn call_order(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(m, _)| *m).collect()
    }

    /// Details recorded for `method`, in order.
    pub fn details(&self, method: &str) -> Vec<String> {
        self.calls.lock().unwrap().iter().filter(|(m, _)| *m == method).map(|(_, d)| d.clone()).collect()
    }

    fn record(&self, method: &'static str, detail: impl Into<String>) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push((method, detail.into()));
        match self.failures.lock().unwrap().get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FormApi for MockApi {
    async fn fetch_forms(&self) -> Result<Vec<FormSummary>, ApiError> {
        self.record("fetch_forms", "")?;
        Ok(self.forms.clone())
    }

    async fn fetch_form(&self, form_uuid: &str) -> Result<FormDefinition, ApiError> {
        self.record("fetch_form", form_uuid)?;
        Ok(self.form.clone())
    }

    async fn fetch_form_info(&self, form_uuid: &str) -> Result<FormInfo, ApiError> {
        self.record("fetch_form_info", form_uuid)?;
        Ok(FormInfo {
            id: self.form.id,
            uuid: self.form.uuid.clone(),
            name: self.form.name.clone(),
            version: self.form.version.clone(),
        })
    }

    async fn update_form(&self, form_uuid: &str, request: &FormRenameRequest) -> Result<FormDefinition, ApiError> {
        self.record("update_form", form_uuid)?;
        self.renames.lock().unwrap().push(request.clone());
        let mut form = self.form.clone();
        form.name.clone_from(&request.name);
        Ok(form)
    }

    async fn save_form_resource(&self, payload: &SaveFormResource) -> Result<SavedFormResource, ApiError> {
        self.record("save_form_resource", payload.form.uuid.clone())?;
        self.saved.lock().unwrap().push(payload.clone());
        let mut form = self.form.clone();
        form.name.clone_from(&payload.form.name);
        form.resources.clear();
        let uuid = if payload.uuid.is_empty() { "resource-1".to_owned() } else { payload.uuid.clone() };
        Ok(SavedFormResource {
            form,
            data_type: Some(FORM_RESOURCE_DATA_TYPE.to_owned()),
            value: payload.value.clone(),
            uuid,
        })
    }

    async fn publish_form(&self, form_uuid: &str) -> Result<PublishedForm, ApiError> {
        self.record("publish_form", form_uuid)?;
        Ok(self.published.clone())
    }

    async fn search_concepts(&self, data_types: &str, name: &str) -> Result<Vec<Concept>, ApiError> {
        self.record("search_concepts", format!("{data_types}|{name}"))?;
        let needle = name.to_lowercase();
        Ok(self
            .concepts
            .iter()
            .filter(|c| data_types.split(',').any(|t| t == c.datatype_name()))
            .filter(|c| c.name.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn concept_by_name(&self, name: &str) -> Result<Option<Concept>, ApiError> {
        self.record("concept_by_name", name)?;
        Ok(self.concepts.iter().find(|c| c.name.name == name).cloned())
    }

    async fn allowed_locales(&self) -> Result<Vec<Locale>, ApiError> {
        self.record("allowed_locales", "")?;
        Ok(self.locales.clone())
    }

    async fn fetch_translations(
        &self,
        form_name: &str,
        form_version: &str,
        locale: &str,
    ) -> Result<LocaleTranslations, ApiError> {
        self.record("fetch_translations", format!("{form_name}|{form_version}|{locale}"))?;
        Ok(self.translations.get(locale).cloned().unwrap_or_default())
    }

    async fn save_translations(&self, payload: &[SaveTranslationPayload]) -> Result<(), ApiError> {
        self.record("save_translations", payload.len().to_string())?;
        self.translation_saves.lock().unwrap().push(payload.to_vec());
        Ok(())
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn summary(uuid: &str, name: &str, published: bool) -> FormSummary {
    FormSummary { id: 1, uuid: uuid.into(), name: name.into(), version: "1".into(), published, audit_info: None }
}

/// A form whose first resource stores `controls`; no resource when empty.
pub fn form(published: bool, controls: &[ControlDescriptor]) -> FormDefinition {
    let resources = if controls.is_empty() {
        Vec::new()
    } else {
        let json = FormJson { id: "form-1".into(), uuid: "form-1".into(), controls: controls.to_vec() };
        vec![FormResource {
            name: Some("Vitals".into()),
            data_type: Some(FORM_RESOURCE_DATA_TYPE.into()),
            value: serde_json::to_string(&json).unwrap(),
            uuid: "resource-1".into(),
        }]
    };
    FormDefinition {
        id: 1,
        uuid: "form-1".into(),
        name: "Vitals".into(),
        version: "1".into(),
        published,
        editable: false,
        resources,
        audit_info: None,
    }
}

/// A concept as the search endpoint returns it (no `display`).
pub fn concept(uuid: &str, name: &str, datatype: &str) -> Concept {
    Concept {
        uuid: uuid.into(),
        display: None,
        name: ConceptName { uuid: format!("{uuid}-name"), name: name.into() },
        concept_class: Some(NamedRef { uuid: String::new(), name: "Misc".into() }),
        datatype: NamedRef { uuid: String::new(), name: datatype.into() },
        set: false,
        set_members: Vec::new(),
        allow_decimal: None,
    }
}

pub fn translation_data(concepts: &[(&str, &str)], labels: &[(&str, &str)]) -> LocaleTranslations {
    let lift = |pairs: &[(&str, &str)]| {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), vec![(*v).to_owned()])).collect::<BTreeMap<_, _>>()
    };
    LocaleTranslations { concepts: lift(concepts), labels: lift(labels) }
}
