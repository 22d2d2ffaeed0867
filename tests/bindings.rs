#![cfg(feature = "serde")]

use std::collections::BTreeMap;

use condfmt::{Bindings, ErrorKind};

#[derive(serde::Serialize)]
struct Context {
    user: String,
    channel: &'static str,
    ping: bool,
    count: u32,
    ratio: f64,
    topic: Option<String>,
}

#[test]
fn from_serialize_struct() {
    let ctx = Context {
        user: "Alice".into(),
        channel: "general",
        ping: true,
        count: 3,
        ratio: 0.5,
        topic: None,
    };
    let b = Bindings::from_serialize(&ctx).unwrap();
    let exp = Bindings::new()
        .with("user", "Alice")
        .with("channel", "general")
        .with("ping", true)
        .with("count", "3")
        .with("ratio", "0.5")
        .with("topic", "");
    assert_eq!(b, exp);
}

#[test]
fn from_serialize_render() {
    let ctx = Context {
        user: "Alice".into(),
        channel: "general",
        ping: false,
        count: 3,
        ratio: 0.5,
        topic: Some("rust".into()),
    };
    let b = Bindings::from_serialize(&ctx).unwrap();
    let result = condfmt::format(
        "%[%ping%|%@%]%%[user]% (%[count]%) %[%topic%|%on %[topic!u]%%|%idle%]%",
        &b,
    )
    .unwrap();
    assert_eq!(result, "Alice (3) on RUST");
}

#[test]
fn from_serialize_map() {
    let map = BTreeMap::from([("Lorem", "ipsum"), ("dolor", "")]);
    let tables = Bindings::from_serialize(map).unwrap().resolve();
    assert_eq!(tables.value("lorem"), Some("ipsum"));
    assert_eq!(tables.condition("dolor"), Some(false));
}

#[test]
fn from_serialize_err_not_a_map() {
    let err = Bindings::from_serialize(["lorem", "ipsum"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialize);
    assert_eq!(err.to_string(), "expected a map of bindings, found list");
    assert_eq!(err.line_col(), None);

    let err = Bindings::from_serialize("lorem").unwrap_err();
    assert_eq!(err.to_string(), "expected a map of bindings, found string");
}

#[test]
fn from_serialize_err_nested() {
    let map = BTreeMap::from([("lorem", vec!["ipsum"])]);
    let err = Bindings::from_serialize(map).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialize);
    assert_eq!(err.to_string(), "unsupported binding `lorem`, found list");
}

#[test]
fn from_serialize_err_non_string_keys() {
    let map = BTreeMap::from([((1, 2), "ipsum")]);
    let err = Bindings::from_serialize(map).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialize);
}
