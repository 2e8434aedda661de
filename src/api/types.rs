//! Response envelopes that only the HTTP layer sees.

use serde::Deserialize;

use designer::translations::LocaleNames;

/// OpenMRS list envelope: `{ "results": [...] }`.
#[derive(Debug, Deserialize)]
pub struct Results<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// An allowed locale from `locale_languages.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    pub code: String,
    #[serde(default)]
    pub native_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LocalesResponse {
    #[serde(default)]
    pub locales: Vec<Locale>,
}

/// Locale code to native name, falling back to the code when unnamed.
#[must_use]
pub fn locale_names(locales: &[Locale]) -> LocaleNames {
    locales
        .iter()
        .map(|l| {
            let name = if l.native_name.is_empty() { l.code.clone() } else { l.native_name.clone() };
            (l.code.clone(), name)
        })
        .collect()
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
