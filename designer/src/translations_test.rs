use serde_json::json;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn wire(value: serde_json::Value) -> LocaleTranslations {
    serde_json::from_value(value).unwrap()
}

fn names() -> LocaleNames {
    [("en", "English"), ("es", "Español"), ("fr", "Français")]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

fn english() -> LocaleTranslations {
    wire(json!({
        "concepts": {
            "EXAMINATION_NOTES_18_DESC": ["desc Examination Notes"],
            "SEVERE_UNDERNUTRITION_13": ["Severe Undernutrition"]
        },
        "labels": {
            "SECTION_12": ["Vitals Section"],
            "LABEL_1": ["Vitals Label"]
        },
        "locale": "en"
    }))
}

// =============================================================
// load
// =============================================================

#[test]
fn load_keeps_first_candidate_only() {
    let mut store = TranslationStore::new("en");
    store.load("en", &wire(json!({ "concepts": { "K": ["V1", "V2"] }, "labels": {} })));
    let table = store.present(&names(), "en", "en");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].value(TranslationType::Concepts, "K"), Some("V1"));
}

#[test]
fn load_skips_keys_without_candidates() {
    let mut store = TranslationStore::new("en");
    store.load("en", &wire(json!({ "labels": { "EMPTY": [], "LABEL_1": ["x"] } })));
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn load_records_entries_by_type_and_locale() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    let entries = store.entries();
    assert_eq!(entries.len(), 4);
    assert!(entries.contains(&TranslationEntry {
        translation_key: "SECTION_12".into(),
        locale: "en".into(),
        kind: TranslationType::Labels,
        value: "Vitals Section".into(),
    }));
}

#[test]
fn load_same_key_replaces_value() {
    let mut store = TranslationStore::new("en");
    store.load("es", &wire(json!({ "labels": { "L": ["uno"] } })));
    store.load("es", &wire(json!({ "labels": { "L": ["dos"] } })));
    assert_eq!(store.dataset("es").and_then(|d| d.value(TranslationType::Labels, "L")), Some("dos"));
}

// =============================================================
// clear / remove_locale
// =============================================================

#[test]
fn clear_drops_everything() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    store.load("es", &english());
    store.clear();
    assert_eq!(store.locales().count(), 0);
}

#[test]
fn remove_locale_drops_only_that_locale() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    store.load("es", &english());
    store.remove_locale("es");
    assert_eq!(store.locales().collect::<Vec<_>>(), vec!["en"]);
}

#[test]
fn remove_locale_never_drops_default() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    store.remove_locale("en");
    assert_eq!(store.entries().len(), 4);
}

// =============================================================
// present
// =============================================================

#[test]
fn present_same_locale_has_two_headers_one_row() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    let table = store.present(&names(), "en", "en");
    assert_eq!(table.headers, vec!["Translation Key", "Default Locale (English)"]);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].locale, "en");
}

#[test]
fn present_comparison_locale_has_three_headers_two_rows() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    store.load("es", &wire(json!({ "concepts": { "SEVERE_UNDERNUTRITION_13": ["Severe Undernutrition es"] } })));
    let table = store.present(&names(), "en", "es");
    assert_eq!(table.headers, vec!["Translation Key", "Default Locale (English)", "Español"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].locale, "en");
    assert_eq!(table.rows[1].locale, "es");
}

#[test]
fn present_unloaded_comparison_yields_empty_column() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    let table = store.present(&names(), "en", "fr");
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows[1].concepts.is_empty());
}

#[test]
fn present_unknown_locale_name_falls_back_to_code() {
    let store = TranslationStore::new("en");
    let table = store.present(&LocaleNames::new(), "en", "pt");
    assert_eq!(table.headers, vec!["Translation Key", "Default Locale (en)", "pt"]);
}

#[test]
fn grid_rows_align_values_by_column() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    store.load("es", &wire(json!({ "labels": { "LABEL_1": ["Etiqueta"] } })));
    let rows = store.present(&names(), "en", "es").grid_rows();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].kind, TranslationType::Concepts);
    let label = rows.iter().find(|r| r.translation_key == "LABEL_1").unwrap();
    assert_eq!(label.values, vec![Some("Vitals Label".to_owned()), Some("Etiqueta".to_owned())]);
    let section = rows.iter().find(|r| r.translation_key == "SECTION_12").unwrap();
    assert_eq!(section.values, vec![Some("Vitals Section".to_owned()), None]);
}

// =============================================================
// build_save_request
// =============================================================

#[test]
fn save_request_has_one_payload_per_locale() {
    let mut store = TranslationStore::new("en");
    store.load("en", &english());
    store.load("es", &wire(json!({ "labels": { "LABEL_1": ["Etiqueta"] } })));
    let payloads = store.build_save_request("F", "1");
    assert_eq!(payloads.len(), 2);
    for payload in &payloads {
        assert_eq!(payload.form_name, "F");
        assert_eq!(payload.version, "1");
    }
    assert_eq!(payloads[0].locale, "en");
    assert_eq!(payloads[0].data.concepts.len(), 2);
    assert_eq!(payloads[1].locale, "es");
    assert_eq!(payloads[1].data.labels.get("LABEL_1"), Some(&vec!["Etiqueta".to_owned()]));
}

#[test]
fn save_payload_serializes_flat() {
    let mut store = TranslationStore::new("en");
    store.load("es", &wire(json!({ "labels": { "LABEL_1": ["Etiqueta"] } })));
    let payloads = store.build_save_request("F", "1");
    assert_eq!(
        serde_json::to_value(&payloads[0]).unwrap(),
        json!({
            "concepts": {},
            "labels": { "LABEL_1": ["Etiqueta"] },
            "formName": "F",
            "version": "1",
            "locale": "es"
        })
    );
}

#[test]
fn entry_type_serializes_lowercase() {
    assert_eq!(serde_json::to_value(TranslationType::Concepts).unwrap(), json!("concepts"));
}
