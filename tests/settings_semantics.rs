use std::sync::Arc;

use prototype::prelude::*;
use prototype::{JsonFileStore, PrototypeError, Widget, REDACTED};
use serde_json::json;

#[prototype(kinds = settings)]
struct General {
    #[initial(true)]
    enabled: bool,
    limit: Option<i64>,
    #[field(readonly)]
    nickname: Option<String>,
    #[section("Account")]
    #[field(secure)]
    token: String,
}

#[prototype(kinds = settings)]
struct Limits {
    #[initial(Some(5))]
    retries: Option<u8>,
}

#[test]
fn defaults_apply_until_something_is_stored() {
    let store = MemoryStore::shared();
    let settings = GeneralSettingsView::new(store.clone());
    let body = settings.body();

    let Some(Node::Control(enabled)) = body.find("enabled") else {
        panic!("enabled control missing");
    };
    assert_eq!(enabled.value, Value::Bool(true));
    assert_eq!(enabled.widget, Widget::Toggle);
    // 可选成员经适配器读出零值
    assert_eq!(body.text_of("limit"), Some("0"));
    assert!(store.snapshot().is_empty());
}

#[test]
fn optional_members_bind_through_adapters() {
    let store = MemoryStore::shared();
    let settings = GeneralSettingsView::new(store.clone());

    let limit = settings.limit_binding();
    assert_eq!(limit.get(), 0);
    limit.set(25).unwrap();
    assert_eq!(limit.get(), 25);
    assert_eq!(store.snapshot()["General.limit"], json!(25));

    let nickname = settings.nickname_binding();
    assert!(nickname.is_read_only());
    assert_eq!(nickname.get(), "");
    assert!(nickname.set("ada".into()).is_err());
}

#[test]
fn update_persists_and_clears() {
    let store = MemoryStore::shared();
    let settings = GeneralSettingsView::new(store.clone());

    settings
        .update(&FieldPath::from("enabled"), Value::Bool(false))
        .unwrap();
    settings
        .update(&FieldPath::from("limit"), Value::Int(10))
        .unwrap();
    assert_eq!(store.snapshot()["General.enabled"], json!(false));
    assert_eq!(settings.limit_binding().get(), 10);

    settings
        .update(&FieldPath::from("limit"), Value::Null)
        .unwrap();
    assert_eq!(store.snapshot()["General.limit"], json!(null));
    assert_eq!(settings.limit_binding().get(), 0);

    assert_eq!(
        settings.update(&FieldPath::from("nickname"), Value::Text("x".into())),
        Err(PrototypeError::ReadOnly(FieldPath::from("nickname")))
    );
    assert_eq!(
        settings.update(&FieldPath::from("volume"), Value::Int(1)),
        Err(PrototypeError::UnknownField(FieldPath::from("volume")))
    );
}

#[test]
fn secure_members_are_masked_in_their_section() {
    let store = MemoryStore::shared();
    let settings = GeneralSettingsView::new(store.clone());
    settings
        .update(&FieldPath::from("token"), Value::Text("s3cret".into()))
        .unwrap();
    assert_eq!(store.snapshot()["General.token"], json!("s3cret"));

    let body = settings.body();
    let section = body
        .children()
        .iter()
        .find(|node| matches!(node, Node::Section { .. }))
        .expect("Account section");
    let Node::Section { header, .. } = section else {
        unreachable!()
    };
    assert_eq!(header.as_deref(), Some("GeneralSettingsView.Account"));
    let Some(Node::Control(token)) = section.find("token") else {
        panic!("token control missing");
    };
    assert_eq!(token.widget, Widget::SecureField);
    assert_eq!(token.text, REDACTED);
    assert_eq!(token.value, Value::Text("s3cret".into()));
}

#[test]
fn values_survive_a_file_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("general.json");
    {
        let store: SharedStore = Arc::new(JsonFileStore::open(&path).unwrap());
        let settings = GeneralSettingsView::new(store);
        settings.limit_binding().set(42).unwrap();
    }
    let store: SharedStore = Arc::new(JsonFileStore::open(&path).unwrap());
    let settings = GeneralSettingsView::new(store);
    assert_eq!(settings.limit_binding().get(), 42);
    assert_eq!(settings.body().text_of("limit"), Some("42"));
}

#[test]
fn optional_members_take_an_optional_initial() {
    let store = MemoryStore::shared();
    let settings = LimitsSettingsView::new(store.clone());
    assert_eq!(settings.retries_binding().get(), 5);
    assert_eq!(settings.body().text_of("retries"), Some("5"));
    assert!(store.snapshot().is_empty());
}
