//! API: the OpenMRS/Bahmni REST collaborator.
//!
//! DESIGN
//! ======
//! Sessions talk to the backend only through the [`FormApi`] trait so they
//! can be exercised against in-memory mocks. [`openmrs::OpenMrsClient`] is
//! the `reqwest` implementation; every call is a single request with no
//! retry.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-2xx statuses, and unparsable bodies each map to
//! one [`ApiError`] variant. Callers turn them into notifications.

pub mod openmrs;
pub mod types;
pub mod urls;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use designer::concept::Concept;
use designer::form::{
    FormDefinition, FormInfo, FormRenameRequest, FormSummary, PublishedForm, SaveFormResource, SavedFormResource,
};
use designer::translations::{LocaleTranslations, SaveTranslationPayload};

use types::Locale;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL could not be combined with an endpoint.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend returned a non-success HTTP status.
    #[error("response error: status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "E_INVALID_URL",
            Self::Request(_) => "E_API_REQUEST",
            Self::Response { .. } => "E_API_RESPONSE",
            Self::Parse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

// =============================================================================
// FACADE
// =============================================================================

/// Every backend call the form builder makes.
#[async_trait]
pub trait FormApi: Send + Sync {
    async fn fetch_forms(&self) -> Result<Vec<FormSummary>, ApiError>;

    async fn fetch_form(&self, form_uuid: &str) -> Result<FormDefinition, ApiError>;

    /// Name and version only, for the translation screens.
    async fn fetch_form_info(&self, form_uuid: &str) -> Result<FormInfo, ApiError>;

    /// Rename a form.
    async fn update_form(&self, form_uuid: &str, request: &FormRenameRequest) -> Result<FormDefinition, ApiError>;

    async fn save_form_resource(&self, payload: &SaveFormResource) -> Result<SavedFormResource, ApiError>;

    async fn publish_form(&self, form_uuid: &str) -> Result<PublishedForm, ApiError>;

    /// Auto-complete search restricted to `data_types` (comma-separated).
    async fn search_concepts(&self, data_types: &str, name: &str) -> Result<Vec<Concept>, ApiError>;

    /// First concept whose fully specified name is `name`, if any.
    async fn concept_by_name(&self, name: &str) -> Result<Option<Concept>, ApiError>;

    async fn allowed_locales(&self) -> Result<Vec<Locale>, ApiError>;

    async fn fetch_translations(
        &self,
        form_name: &str,
        form_version: &str,
        locale: &str,
    ) -> Result<LocaleTranslations, ApiError>;

    async fn save_translations(&self, payload: &[SaveTranslationPayload]) -> Result<(), ApiError>;
}
