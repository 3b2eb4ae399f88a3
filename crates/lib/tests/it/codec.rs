//! On-disk round-trip tests through the codec.

use canopy::{DocumentStore, Mode, Value};

use crate::helpers::{file_contents, open_store};

#[test]
fn key_order_survives_a_reopen() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("zeta", 1).unwrap();
    fixture.store.set("alpha", 2).unwrap();
    fixture.store.set("mid", 3).unwrap();

    let reopened = DocumentStore::open(&fixture.path, Mode::Blocking).unwrap();
    let keys: Vec<String> = reopened.read().keys().cloned().collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

#[test]
fn string_values_that_look_like_other_scalars_stay_strings() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("answer", "42").unwrap();
    fixture.store.set("flag", "true").unwrap();
    fixture.store.set("nothing", "null").unwrap();

    assert_eq!(
        file_contents(&fixture),
        "answer: '42'\nflag: 'true'\nnothing: 'null'\n"
    );

    let reopened = DocumentStore::open(&fixture.path, Mode::Blocking).unwrap();
    assert_eq!(reopened.get("answer"), Some("42".into()));
    assert_eq!(reopened.get("flag"), Some("true".into()));
    assert_eq!(reopened.get("nothing"), Some("null".into()));
}

#[test]
fn nested_documents_round_trip() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("app.name", "canopy").unwrap();
    fixture.store.set("app.threads", 4).unwrap();
    fixture.store.set("app.ratio", 0.5).unwrap();
    fixture.store.create_sequence("hosts").unwrap();
    fixture.store.add_to_section("hosts", None, "a.example").unwrap();
    fixture.store.add_to_section("hosts", None, "b.example").unwrap();

    let before = fixture.store.read().clone();
    let reopened = DocumentStore::open(&fixture.path, Mode::Blocking).unwrap();
    assert_eq!(*reopened.read(), before);
}

#[test]
fn multiline_strings_are_escaped_and_recovered() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("note", "line one\nline two").unwrap();
    assert_eq!(file_contents(&fixture), "note: \"line one\\nline two\"\n");

    let reopened = DocumentStore::open(&fixture.path, Mode::Blocking).unwrap();
    assert_eq!(reopened.get("note"), Some("line one\nline two".into()));
}

#[test]
fn the_file_never_contains_carriage_returns() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("a.b", 1).unwrap();
    fixture.store.set("c", vec![Value::from("x"), Value::from("y")]).unwrap();
    assert!(!file_contents(&fixture).contains('\r'));
}
