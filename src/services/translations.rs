//! Form translations screen.
//!
//! DESIGN
//! ======
//! Opening runs three requests in order: allowed locales, then form name and
//! version, then the default locale's translations. Each stage starts only
//! after the previous one succeeded; a failure shows that stage's message
//! and stops the chain.
//!
//! Switching the comparison locale is last-write-wins. `begin_switch` hands
//! out a monotonically increasing token and `complete_switch` drops any
//! response whose token is no longer the latest, so a slow answer for an
//! earlier choice can never overwrite a newer one. Accepting a switch drops
//! the previous comparison locale's strings; the default locale is kept.

use std::sync::Arc;

use designer::form::FormInfo;
use designer::translations::{
    LocaleNames, LocaleTranslations, SaveTranslationPayload, TranslationEntry, TranslationStore, TranslationTable,
};
use tracing::{debug, info, warn};

use super::SessionError;
use super::notify::Notifier;
use crate::api::types::{Locale, locale_names};
use crate::api::{ApiError, FormApi};

pub const LOCALES_FETCH_FAILED: &str = "Failed to fetch locales information";
pub const FORM_INFO_FETCH_FAILED: &str = "Failed to fetch form information";
pub const TRANSLATIONS_SAVED_MESSAGE: &str = "Form translations saved successfully";

fn translation_fetch_failed(locale_name: &str) -> String {
    format!("Failed to fetch translation for [{locale_name}] locale")
}

// =============================================================================
// PENDING REQUESTS
// =============================================================================

/// An issued locale switch, stamped with its request token.
#[derive(Debug, Clone)]
pub struct LocaleSwitch {
    token: u64,
    locale: String,
    form_name: String,
    form_version: String,
}

impl LocaleSwitch {
    /// # Errors
    ///
    /// Returns the translate request's error.
    pub async fn execute(&self, api: &dyn FormApi) -> Result<LocaleTranslations, ApiError> {
        api.fetch_translations(&self.form_name, &self.form_version, &self.locale).await
    }

    #[must_use]
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// A translation save marked in flight.
#[derive(Debug, Clone)]
pub struct PendingTranslationSave {
    payload: Vec<SaveTranslationPayload>,
}

impl PendingTranslationSave {
    /// # Errors
    ///
    /// Returns the save request's error.
    pub async fn execute(&self, api: &dyn FormApi) -> Result<(), ApiError> {
        api.save_translations(&self.payload).await
    }

    #[must_use]
    pub fn payload(&self) -> &[SaveTranslationPayload] {
        &self.payload
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct TranslationSession {
    api: Arc<dyn FormApi>,
    form_uuid: String,
    locales: Vec<Locale>,
    locale_names: LocaleNames,
    form: Option<FormInfo>,
    store: TranslationStore,
    comparison_locale: String,
    latest_token: u64,
    notifier: Notifier,
    saving: bool,
    mounted: bool,
}

impl TranslationSession {
    #[must_use]
    pub fn new(
        api: Arc<dyn FormApi>,
        form_uuid: impl Into<String>,
        default_locale: impl Into<String>,
        notifier: Notifier,
    ) -> Self {
        let default_locale = default_locale.into();
        Self {
            api,
            form_uuid: form_uuid.into(),
            locales: Vec::new(),
            locale_names: LocaleNames::new(),
            form: None,
            comparison_locale: default_locale.clone(),
            store: TranslationStore::new(default_locale),
            latest_token: 0,
            notifier,
            saving: false,
            mounted: true,
        }
    }

    /// Run the open chain: locales, form info, default translations.
    ///
    /// # Errors
    ///
    /// [`SessionError::Network`] carrying the failed stage's message.
    pub async fn open(&mut self) -> Result<TranslationTable, SessionError> {
        self.ensure_mounted()?;
        self.latest_token = self.latest_token.wrapping_add(1);
        self.store.clear();

        let locales = self.api.allowed_locales().await;
        let locales = locales.map_err(|e| self.stage_failed(LOCALES_FETCH_FAILED.to_owned(), e))?;
        self.locale_names = locale_names(&locales);
        self.locales = locales;

        let info = self.api.fetch_form_info(&self.form_uuid).await;
        let info = info.map_err(|e| self.stage_failed(FORM_INFO_FETCH_FAILED.to_owned(), e))?;

        let default_locale = self.store.default_locale().to_owned();
        let data = self.api.fetch_translations(&info.name, &info.version, &default_locale).await;
        let data = data.map_err(|e| {
            let message = translation_fetch_failed(&self.locale_name(&default_locale));
            self.stage_failed(message, e)
        })?;

        info!(form = %info.name, version = %info.version, locale = %default_locale, "translations opened");
        self.store.load(&default_locale, &data);
        self.comparison_locale = default_locale;
        self.form = Some(info);
        Ok(self.table())
    }

    // --- Locale switching ---

    /// Issue a switch of the comparison column to `locale`.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotLoaded`] before `open` succeeded,
    /// [`SessionError::Unmounted`] after `unmount`.
    pub fn begin_switch(&mut self, locale: &str) -> Result<LocaleSwitch, SessionError> {
        self.ensure_mounted()?;
        let form = self.form.as_ref().ok_or(SessionError::NotLoaded)?;
        self.latest_token = self.latest_token.wrapping_add(1);
        debug!(locale, token = self.latest_token, "locale switch issued");
        Ok(LocaleSwitch {
            token: self.latest_token,
            locale: locale.to_owned(),
            form_name: form.name.clone(),
            form_version: form.version.clone(),
        })
    }

    /// Apply a switch response. Returns `Ok(false)` when the response was
    /// superseded by a later switch and has been discarded.
    ///
    /// # Errors
    ///
    /// [`SessionError::Network`] if the latest switch failed,
    /// [`SessionError::Unmounted`] after `unmount`.
    pub fn complete_switch(
        &mut self,
        switch: &LocaleSwitch,
        outcome: Result<LocaleTranslations, ApiError>,
    ) -> Result<bool, SessionError> {
        self.ensure_mounted()?;
        if switch.token != self.latest_token {
            debug!(locale = %switch.locale, token = switch.token, latest = self.latest_token, "stale switch dropped");
            return Ok(false);
        }
        let data = outcome.map_err(|e| {
            let message = translation_fetch_failed(&self.locale_name(&switch.locale));
            self.stage_failed(message, e)
        })?;
        let previous = std::mem::replace(&mut self.comparison_locale, switch.locale.clone());
        if previous != switch.locale {
            self.store.remove_locale(&previous);
        }
        self.store.load(&switch.locale, &data);
        Ok(true)
    }

    /// Switch the comparison column and return the new grid.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_switch`] and [`Self::complete_switch`].
    pub async fn switch_locale(&mut self, locale: &str) -> Result<TranslationTable, SessionError> {
        let switch = self.begin_switch(locale)?;
        let api = Arc::clone(&self.api);
        let outcome = switch.execute(api.as_ref()).await;
        self.complete_switch(&switch, outcome)?;
        Ok(self.table())
    }

    // --- Grid ---

    /// The grid for the default and comparison columns.
    #[must_use]
    pub fn table(&self) -> TranslationTable {
        self.store.present(&self.locale_names, self.store.default_locale(), &self.comparison_locale)
    }

    /// Record an edit made in the grid.
    pub fn set_value(&mut self, entry: TranslationEntry) {
        self.store.set_value(entry);
    }

    #[must_use]
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    #[must_use]
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    #[must_use]
    pub fn form(&self) -> Option<&FormInfo> {
        self.form.as_ref()
    }

    #[must_use]
    pub fn comparison_locale(&self) -> &str {
        &self.comparison_locale
    }

    // --- Save ---

    /// Build the save request for every loaded locale and mark it in flight.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while a save is pending, [`SessionError::NotLoaded`]
    /// before `open` succeeded.
    pub fn begin_save(&mut self) -> Result<PendingTranslationSave, SessionError> {
        self.ensure_mounted()?;
        if self.saving {
            return Err(SessionError::Busy);
        }
        let form = self.form.as_ref().ok_or(SessionError::NotLoaded)?;
        let payload = self.store.build_save_request(&form.name, &form.version);
        self.saving = true;
        Ok(PendingTranslationSave { payload })
    }

    /// # Errors
    ///
    /// [`SessionError::Network`] if the save failed, [`SessionError::Unmounted`]
    /// after `unmount`.
    pub fn complete_save(&mut self, outcome: Result<(), ApiError>) -> Result<(), SessionError> {
        self.saving = false;
        self.ensure_mounted()?;
        match outcome {
            Ok(()) => {
                info!(form = %self.form_uuid, "translations saved");
                self.notifier.success(TRANSLATIONS_SAVED_MESSAGE);
                Ok(())
            }
            Err(e) => {
                warn!(form = %self.form_uuid, error = %e, "translation save failed");
                let err = SessionError::network(e);
                self.notifier.error(err.to_string());
                Err(err)
            }
        }
    }

    /// # Errors
    ///
    /// See [`Self::begin_save`] and [`Self::complete_save`].
    pub async fn save(&mut self) -> Result<(), SessionError> {
        let pending = self.begin_save()?;
        let api = Arc::clone(&self.api);
        let outcome = pending.execute(api.as_ref()).await;
        self.complete_save(outcome)
    }

    // --- Lifecycle ---

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Navigate away: clear translations, stop the notification timer, and
    /// ignore any completion that arrives later.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.notifier.cancel();
        self.store.clear();
    }

    fn ensure_mounted(&self) -> Result<(), SessionError> {
        if self.mounted { Ok(()) } else { Err(SessionError::Unmounted) }
    }

    fn locale_name(&self, code: &str) -> String {
        self.locale_names.get(code).cloned().unwrap_or_else(|| code.to_owned())
    }

    fn stage_failed(&mut self, message: String, source: ApiError) -> SessionError {
        warn!(form = %self.form_uuid, error = %source, "{message}");
        self.notifier.error(message.clone());
        SessionError::network_with(message, source)
    }
}

#[cfg(test)]
#[path = "translations_test.rs"]
mod tests;
