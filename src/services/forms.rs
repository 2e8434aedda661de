//! Form list screen.

use std::sync::Arc;

use designer::form::FormSummary;
use tracing::{info, warn};

use super::SessionError;
use super::notify::Notifier;
use crate::api::FormApi;

pub struct FormListSession {
    api: Arc<dyn FormApi>,
    forms: Vec<FormSummary>,
    notifier: Notifier,
}

impl FormListSession {
    #[must_use]
    pub fn new(api: Arc<dyn FormApi>, notifier: Notifier) -> Self {
        Self { api, forms: Vec::new(), notifier }
    }

    /// Fetch the form list. On failure the previous list is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Network`] if the request fails.
    pub async fn load(&mut self) -> Result<&[FormSummary], SessionError> {
        match self.api.fetch_forms().await {
            Ok(forms) => {
                info!(count = forms.len(), "forms loaded");
                self.forms = forms;
                Ok(&self.forms)
            }
            Err(e) => {
                warn!(error = %e, "form list fetch failed");
                let err = SessionError::network(e);
                self.notifier.error(err.to_string());
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn forms(&self) -> &[FormSummary] {
        &self.forms
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
