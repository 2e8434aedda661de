use super::*;

#[test]
fn form_list_path() {
    assert_eq!(form_list().to_string(), "/openmrs/ws/rest/v1/form?v=custom:(id,uuid,name,version,published,auditInfo)");
}

#[test]
fn form_detail_path() {
    assert_eq!(
        form_detail("FID").to_string(),
        "/openmrs/ws/rest/v1/form/FID?v=custom:(id,uuid,name,version,published,auditInfo,resources:(value,dataType,uuid))"
    );
}

#[test]
fn form_info_path() {
    assert_eq!(form_info("form_uuid").to_string(), "/openmrs/ws/rest/v1/form/form_uuid?v=custom:(id,uuid,name,version)");
}

#[test]
fn save_and_publish_paths() {
    assert_eq!(save_form_resource().to_string(), "/openmrs/ws/rest/v1/bahmniIE/save");
    assert_eq!(publish_form("abc").to_string(), "/openmrs/ws/rest/v1/bahmniIE/publish?formUuid=abc");
    assert_eq!(form_update("abc").to_string(), "/openmrs/ws/rest/v1/form/abc");
}

#[test]
fn translation_paths() {
    assert_eq!(
        translations("form_name", "2", "en").to_string(),
        "/openmrs/ws/rest/v1/bahmniie/form/translate?formName=form_name&formVersion=2&locale=en"
    );
    assert_eq!(save_translations().to_string(), "/openmrs/ws/rest/v1/bahmniie/form/saveTranslation");
    assert_eq!(allowed_locales().to_string(), "/bahmni_config/openmrs/apps/home/locale_languages.json");
}

#[test]
fn concept_paths() {
    assert_eq!(
        concept_by_name("Temperature").to_string(),
        "/openmrs/ws/rest/v1/concept?s=byFullySpecifiedName&locale=en&name=Temperature&v=bahmni"
    );
    let search = concept_search("Boolean,Text,Numeric,N/A", "temp").to_string();
    assert!(search.starts_with("/openmrs/ws/rest/v1/concept?s=byDataType&dataTypes=Boolean,Text,Numeric,N/A&v=custom:("));
    assert!(search.ends_with("&name=temp"));
}

#[test]
fn to_url_encodes_values() {
    let url = translations("Vitals Form", "1", "en").to_url("http://emr.test/").unwrap();
    assert_eq!(url.path(), "/openmrs/ws/rest/v1/bahmniie/form/translate");
    let pairs: Vec<(String, String)> = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
    assert_eq!(pairs[0], ("formName".to_owned(), "Vitals Form".to_owned()));
    assert!(url.as_str().contains("formName=Vitals+Form"));
}

#[test]
fn to_url_without_query() {
    let url = save_form_resource().to_url("http://emr.test").unwrap();
    assert_eq!(url.as_str(), "http://emr.test/openmrs/ws/rest/v1/bahmniIE/save");
    assert_eq!(url.query(), None);
}

#[test]
fn to_url_rejects_bad_base() {
    assert!(matches!(form_list().to_url("not a url"), Err(ApiError::InvalidUrl(_))));
}
