//! Integration tests for the list parameters sent to the Kubernetes API

use kubectl_secretdata::adapters::kube_source::list_params;

#[test]
fn plain_list_has_no_selectors() {
    let params = list_params(None, None);
    assert_eq!(params.label_selector, None);
    assert_eq!(params.field_selector, None);
}

#[test]
fn label_selector_is_passed_verbatim() {
    let params = list_params(None, Some("key1=value1,key2!=value2"));
    assert_eq!(
        params.label_selector.as_deref(),
        Some("key1=value1,key2!=value2")
    );
    assert_eq!(params.field_selector, None);
}

#[test]
fn secret_name_becomes_field_selector() {
    let params = list_params(Some("secret1"), None);
    assert_eq!(params.field_selector.as_deref(), Some("metadata.name=secret1"));
    assert_eq!(params.label_selector, None);
}

#[test]
fn name_and_labels_are_combined() {
    let params = list_params(Some("secret1"), Some("app=web"));
    assert_eq!(params.field_selector.as_deref(), Some("metadata.name=secret1"));
    assert_eq!(params.label_selector.as_deref(), Some("app=web"));
}
