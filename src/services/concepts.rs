//! Concept auto-complete and resolution for the property editor.
//!
//! Search results are filtered server-side by the data types the selected
//! control accepts. Choosing a result re-fetches the full concept by its
//! fully specified name, and that concept is what gets bound.

use std::sync::Arc;

use designer::concept::Concept;
use designer::selection::ConceptSearch;
use tracing::debug;

use super::SessionError;
use crate::api::FormApi;

#[derive(Clone)]
pub struct ConceptPicker {
    api: Arc<dyn FormApi>,
}

impl ConceptPicker {
    #[must_use]
    pub fn new(api: Arc<dyn FormApi>) -> Self {
        Self { api }
    }

    /// Search concepts for the current affordance. Nothing is requested
    /// unless searching is enabled and `query` is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Network`] if the request fails.
    pub async fn search(&self, affordance: &ConceptSearch, query: &str) -> Result<Vec<Concept>, SessionError> {
        let ConceptSearch::Enabled { data_types } = affordance else {
            debug!(?affordance, "concept search not enabled");
            return Ok(Vec::new());
        };
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.api.search_concepts(data_types, query).await.map_err(SessionError::network)
    }

    /// Fetch the full concept named `name`, with `display` set to its
    /// fully specified name.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Network`] if the request fails.
    pub async fn resolve(&self, name: &str) -> Result<Option<Concept>, SessionError> {
        let concept = self.api.concept_by_name(name).await.map_err(SessionError::network)?;
        Ok(concept.map(|mut c| {
            c.display = Some(c.name.name.clone());
            c
        }))
    }
}

#[cfg(test)]
#[path = "concepts_test.rs"]
mod tests;
