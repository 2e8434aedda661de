//! Translation store: per-locale label and concept strings for one form.
//!
//! DESIGN
//! ======
//! The translate endpoint returns, per locale, two maps from translation key
//! to an ordered list of candidate strings. Only the first candidate is
//! kept. The store remembers which locale is the default so that switching
//! the comparison column can never drop the reference column.
//!
//! `present` builds what the grid shows: a header row plus one dataset per
//! displayed locale column, default first.

#[cfg(test)]
#[path = "translations_test.rs"]
mod translations_test;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::consts::TRANSLATION_KEY_HEADER;

/// Locale code → native display name (e.g. `"es"` → `"Español"`).
pub type LocaleNames = BTreeMap<String, String>;

/// Which section of the form a translation key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationType {
    Concepts,
    Labels,
}

/// One translated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    pub translation_key: String,
    pub locale: String,
    #[serde(rename = "type")]
    pub kind: TranslationType,
    pub value: String,
}

/// Translations for one locale in the wire shape of the translate and
/// save-translation endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleTranslations {
    #[serde(default)]
    pub concepts: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub labels: BTreeMap<String, Vec<String>>,
}

/// The primary string for every key of one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationDataset {
    pub locale: String,
    pub concepts: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
}

impl TranslationDataset {
    fn empty(locale: &str) -> Self {
        Self { locale: locale.to_owned(), ..Self::default() }
    }

    fn section(&self, kind: TranslationType) -> &BTreeMap<String, String> {
        match kind {
            TranslationType::Concepts => &self.concepts,
            TranslationType::Labels => &self.labels,
        }
    }

    fn section_mut(&mut self, kind: TranslationType) -> &mut BTreeMap<String, String> {
        match kind {
            TranslationType::Concepts => &mut self.concepts,
            TranslationType::Labels => &mut self.labels,
        }
    }

    /// Value for `key` in `kind`, if present.
    #[must_use]
    pub fn value(&self, kind: TranslationType, key: &str) -> Option<&str> {
        self.section(kind).get(key).map(String::as_str)
    }

    fn to_wire(&self) -> LocaleTranslations {
        let lift = |section: &BTreeMap<String, String>| {
            section.iter().map(|(k, v)| (k.clone(), vec![v.clone()])).collect::<BTreeMap<_, _>>()
        };
        LocaleTranslations { concepts: lift(&self.concepts), labels: lift(&self.labels) }
    }
}

/// Display-ready translation grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationTable {
    pub headers: Vec<String>,
    /// One dataset per locale column, in header order.
    pub rows: Vec<TranslationDataset>,
}

/// One line of the flattened grid: a key and its value in every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub kind: TranslationType,
    pub translation_key: String,
    pub values: Vec<Option<String>>,
}

impl TranslationTable {
    /// Flatten datasets into one row per `(type, key)`, concepts first.
    #[must_use]
    pub fn grid_rows(&self) -> Vec<GridRow> {
        let mut keys = BTreeSet::new();
        for dataset in &self.rows {
            for kind in [TranslationType::Concepts, TranslationType::Labels] {
                keys.extend(dataset.section(kind).keys().map(|k| (kind, k.clone())));
            }
        }
        keys.into_iter()
            .map(|(kind, key)| GridRow {
                values: self.rows.iter().map(|d| d.value(kind, &key).map(str::to_owned)).collect(),
                kind,
                translation_key: key,
            })
            .collect()
    }
}

/// Payload for one locale of the save-translation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTranslationPayload {
    #[serde(flatten)]
    pub data: LocaleTranslations,
    pub form_name: String,
    pub version: String,
    pub locale: String,
}

/// Translations for every locale loaded in this session.
#[derive(Debug, Clone)]
pub struct TranslationStore {
    default_locale: String,
    locales: BTreeMap<String, TranslationDataset>,
}

impl TranslationStore {
    /// Create an empty store whose reference column is `default_locale`.
    #[must_use]
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self { default_locale: default_locale.into(), locales: BTreeMap::new() }
    }

    /// The locale that `remove_locale` never drops.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Change the reference locale (e.g. after reading the user's preference).
    pub fn set_default_locale(&mut self, locale: impl Into<String>) {
        self.default_locale = locale.into();
    }

    /// Record the first candidate of every key in `data` under `locale`.
    /// Keys with no candidates are skipped.
    pub fn load(&mut self, locale: &str, data: &LocaleTranslations) {
        for (kind, section) in [(TranslationType::Concepts, &data.concepts), (TranslationType::Labels, &data.labels)] {
            for (key, values) in section {
                let Some(value) = values.first() else {
                    continue;
                };
                self.set_value(TranslationEntry {
                    translation_key: key.clone(),
                    locale: locale.to_owned(),
                    kind,
                    value: value.clone(),
                });
            }
        }
    }

    /// Insert or replace a single entry.
    pub fn set_value(&mut self, entry: TranslationEntry) {
        self.locales
            .entry(entry.locale.clone())
            .or_insert_with(|| TranslationDataset::empty(&entry.locale))
            .section_mut(entry.kind)
            .insert(entry.translation_key, entry.value);
    }

    /// Drop every entry for every locale.
    pub fn clear(&mut self) {
        self.locales.clear();
    }

    /// Drop all entries for `locale`. The default locale is never dropped.
    pub fn remove_locale(&mut self, locale: &str) {
        if locale == self.default_locale {
            return;
        }
        self.locales.remove(locale);
    }

    /// Locales currently held, sorted by code.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    /// Dataset for `locale`, if loaded.
    #[must_use]
    pub fn dataset(&self, locale: &str) -> Option<&TranslationDataset> {
        self.locales.get(locale)
    }

    /// Every entry in the store.
    #[must_use]
    pub fn entries(&self) -> Vec<TranslationEntry> {
        let mut out = Vec::new();
        for (locale, dataset) in &self.locales {
            for kind in [TranslationType::Concepts, TranslationType::Labels] {
                for (key, value) in dataset.section(kind) {
                    out.push(TranslationEntry {
                        translation_key: key.clone(),
                        locale: locale.clone(),
                        kind,
                        value: value.clone(),
                    });
                }
            }
        }
        out
    }

    /// Build the grid for the default column plus, when it differs, the
    /// comparison column. Locale names fall back to the code when unknown.
    #[must_use]
    pub fn present(&self, names: &LocaleNames, default_locale: &str, comparison_locale: &str) -> TranslationTable {
        let name = |code: &str| names.get(code).cloned().unwrap_or_else(|| code.to_owned());
        let dataset = |code: &str| self.locales.get(code).cloned().unwrap_or_else(|| TranslationDataset::empty(code));

        let mut headers = vec![TRANSLATION_KEY_HEADER.to_owned(), format!("Default Locale ({})", name(default_locale))];
        let mut rows = Vec::new();
        if comparison_locale != default_locale {
            headers.push(name(comparison_locale));
            rows.push(dataset(default_locale));
        }
        rows.push(dataset(comparison_locale));
        TranslationTable { headers, rows }
    }

    /// One save payload per locale held, each tagged with the form and locale.
    #[must_use]
    pub fn build_save_request(&self, form_name: &str, form_version: &str) -> Vec<SaveTranslationPayload> {
        self.locales
            .iter()
            .map(|(locale, dataset)| SaveTranslationPayload {
                data: dataset.to_wire(),
                form_name: form_name.to_owned(),
                version: form_version.to_owned(),
                locale: locale.clone(),
            })
            .collect()
    }
}
