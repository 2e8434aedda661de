//! OpenMRS/Bahmni endpoint paths and query strings.
//!
//! Paths and representation strings are fixed by the backend and must stay
//! byte-for-byte identical. An [`Endpoint`] keeps query values unencoded;
//! `to_url` percent-encodes them when the request is built, and `Display`
//! renders the raw form used in logs and tests.

use std::fmt;

use reqwest::Url;

use super::ApiError;

pub const FORM_URL: &str = "/openmrs/ws/rest/v1/form";
pub const CONCEPT_URL: &str = "/openmrs/ws/rest/v1/concept";
pub const SAVE_FORM_RESOURCE_URL: &str = "/openmrs/ws/rest/v1/bahmniIE/save";
pub const PUBLISH_FORM_URL: &str = "/openmrs/ws/rest/v1/bahmniIE/publish";
pub const ALLOWED_LOCALES_URL: &str = "/bahmni_config/openmrs/apps/home/locale_languages.json";
pub const TRANSLATE_URL: &str = "/openmrs/ws/rest/v1/bahmniie/form/translate";
pub const SAVE_TRANSLATION_URL: &str = "/openmrs/ws/rest/v1/bahmniie/form/saveTranslation";

pub const FORM_LIST_REPRESENTATION: &str = "custom:(id,uuid,name,version,published,auditInfo)";
pub const FORM_DETAIL_REPRESENTATION: &str =
    "custom:(id,uuid,name,version,published,auditInfo,resources:(value,dataType,uuid))";
pub const FORM_INFO_REPRESENTATION: &str = "custom:(id,uuid,name,version)";
pub const CONCEPT_REPRESENTATION: &str = "custom:(uuid,set,display,allowDecimal,name:(uuid,name),\
conceptClass:(uuid,name),datatype:(uuid,name),\
setMembers:(uuid,set,display,allowDecimal,name:(uuid,name),conceptClass:(uuid,name),datatype:(uuid,name)))";

/// A backend path plus unencoded query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), query: Vec::new() }
    }

    fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Absolute URL against `base_url`, with query values percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` does not parse.
    pub fn to_url(&self, base_url: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let url = if self.query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, self.query.iter().map(|(k, v)| (*k, v.as_str())))
        };
        url.map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// `GET` form list.
#[must_use]
pub fn form_list() -> Endpoint {
    Endpoint::new(FORM_URL).param("v", FORM_LIST_REPRESENTATION)
}

/// `GET` form detail including resources.
#[must_use]
pub fn form_detail(form_uuid: &str) -> Endpoint {
    Endpoint::new(format!("{FORM_URL}/{form_uuid}")).param("v", FORM_DETAIL_REPRESENTATION)
}

/// `GET` form name and version.
#[must_use]
pub fn form_info(form_uuid: &str) -> Endpoint {
    Endpoint::new(format!("{FORM_URL}/{form_uuid}")).param("v", FORM_INFO_REPRESENTATION)
}

/// `POST` form update (rename).
#[must_use]
pub fn form_update(form_uuid: &str) -> Endpoint {
    Endpoint::new(format!("{FORM_URL}/{form_uuid}"))
}

/// `POST` save form resource.
#[must_use]
pub fn save_form_resource() -> Endpoint {
    Endpoint::new(SAVE_FORM_RESOURCE_URL)
}

/// `POST` publish.
#[must_use]
pub fn publish_form(form_uuid: &str) -> Endpoint {
    Endpoint::new(PUBLISH_FORM_URL).param("formUuid", form_uuid)
}

/// `GET` concept search filtered by data types, for auto-complete.
#[must_use]
pub fn concept_search(data_types: &str, name: &str) -> Endpoint {
    Endpoint::new(CONCEPT_URL)
        .param("s", "byDataType")
        .param("dataTypes", data_types)
        .param("v", CONCEPT_REPRESENTATION)
        .param("name", name)
}

/// `GET` full concept by fully specified name.
#[must_use]
pub fn concept_by_name(name: &str) -> Endpoint {
    Endpoint::new(CONCEPT_URL)
        .param("s", "byFullySpecifiedName")
        .param("locale", "en")
        .param("name", name)
        .param("v", "bahmni")
}

/// `GET` allowed locales.
#[must_use]
pub fn allowed_locales() -> Endpoint {
    Endpoint::new(ALLOWED_LOCALES_URL)
}

/// `GET` translations of one form version for one locale.
#[must_use]
pub fn translations(form_name: &str, form_version: &str, locale: &str) -> Endpoint {
    Endpoint::new(TRANSLATE_URL)
        .param("formName", form_name)
        .param("formVersion", form_version)
        .param("locale", locale)
}

/// `POST` save translations.
#[must_use]
pub fn save_translations() -> Endpoint {
    Endpoint::new(SAVE_TRANSLATION_URL)
}

#[cfg(test)]
#[path = "urls_test.rs"]
mod tests;
