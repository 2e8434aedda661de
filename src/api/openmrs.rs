//! OpenMRS REST client.
//!
//! Thin `reqwest` wrapper over the endpoints in [`super::urls`]. Status
//! handling and body parsing live in pure helpers for testability.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use designer::concept::Concept;
use designer::form::{
    FormDefinition, FormInfo, FormRenameRequest, FormSummary, PublishedForm, SaveFormResource, SavedFormResource,
};
use designer::translations::{LocaleTranslations, SaveTranslationPayload};

use super::types::{Locale, LocalesResponse, Results};
use super::urls::{self, Endpoint};
use super::{ApiError, FormApi};
use crate::config::{BuilderConfig, Credentials};

// =============================================================================
// CLIENT
// =============================================================================

pub struct OpenMrsClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl OpenMrsClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &BuilderConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), credentials: config.credentials.clone() })
    }

    fn request(&self, method: Method, endpoint: &Endpoint) -> Result<RequestBuilder, ApiError> {
        let url = endpoint.to_url(&self.base_url)?;
        let builder = self.http.request(method, url);
        Ok(match &self.credentials {
            Some(c) => builder.basic_auth(&c.username, Some(&c.password)),
            None => builder,
        })
    }

    async fn execute(&self, builder: RequestBuilder, endpoint: &Endpoint) -> Result<String, ApiError> {
        debug!(endpoint = %endpoint, "openmrs request");
        let response = builder.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        check_status(status, text)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, &endpoint)?;
        let text = self.execute(builder, &endpoint).await?;
        parse_body(&text)
    }

    async fn post<B: Serialize + ?Sized>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<String, ApiError> {
        let mut builder = self.request(Method::POST, &endpoint)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder, &endpoint).await
    }
}

#[async_trait]
impl FormApi for OpenMrsClient {
    async fn fetch_forms(&self) -> Result<Vec<FormSummary>, ApiError> {
        let page: Results<FormSummary> = self.get(urls::form_list()).await?;
        Ok(page.results)
    }

    async fn fetch_form(&self, form_uuid: &str) -> Result<FormDefinition, ApiError> {
        self.get(urls::form_detail(form_uuid)).await
    }

    async fn fetch_form_info(&self, form_uuid: &str) -> Result<FormInfo, ApiError> {
        self.get(urls::form_info(form_uuid)).await
    }

    async fn update_form(&self, form_uuid: &str, request: &FormRenameRequest) -> Result<FormDefinition, ApiError> {
        let text = self.post(urls::form_update(form_uuid), Some(request)).await?;
        parse_body(&text)
    }

    async fn save_form_resource(&self, payload: &SaveFormResource) -> Result<SavedFormResource, ApiError> {
        let text = self.post(urls::save_form_resource(), Some(payload)).await?;
        parse_body(&text)
    }

    async fn publish_form(&self, form_uuid: &str) -> Result<PublishedForm, ApiError> {
        let text = self.post::<()>(urls::publish_form(form_uuid), None).await?;
        parse_body(&text)
    }

    async fn search_concepts(&self, data_types: &str, name: &str) -> Result<Vec<Concept>, ApiError> {
        let page: Results<Concept> = self.get(urls::concept_search(data_types, name)).await?;
        Ok(page.results)
    }

    async fn concept_by_name(&self, name: &str) -> Result<Option<Concept>, ApiError> {
        let page: Results<Concept> = self.get(urls::concept_by_name(name)).await?;
        Ok(page.results.into_iter().next())
    }

    async fn allowed_locales(&self) -> Result<Vec<Locale>, ApiError> {
        let response: LocalesResponse = self.get(urls::allowed_locales()).await?;
        Ok(response.locales)
    }

    async fn fetch_translations(
        &self,
        form_name: &str,
        form_version: &str,
        locale: &str,
    ) -> Result<LocaleTranslations, ApiError> {
        self.get(urls::translations(form_name, form_version, locale)).await
    }

    async fn save_translations(&self, payload: &[SaveTranslationPayload]) -> Result<(), ApiError> {
        self.post(urls::save_translations(), Some(payload)).await?;
        Ok(())
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Pass 2xx bodies through; anything else becomes [`ApiError::Response`].
fn check_status(status: u16, body: String) -> Result<String, ApiError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(ApiError::Response { status, body })
    }
}

fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "openmrs_test.rs"]
mod tests;
