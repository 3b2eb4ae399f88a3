//! DocumentStore tests in blocking mode.

use canopy::{DocumentStore, Mode, Value};

use crate::helpers::{file_contents, open_store, open_store_with_contents};

#[test]
fn open_creates_the_backing_file() {
    let fixture = open_store(Mode::Blocking);
    assert!(fixture.path.exists());
    assert_eq!(file_contents(&fixture), "{}\n");
}

#[test]
fn open_normalizes_existing_files() {
    // Two-space indent and flow style both get rewritten to the canonical
    // shape on open.
    let fixture = open_store_with_contents(
        Mode::Blocking,
        Some("server:\n  host: localhost\n  port: 8080\n"),
    );
    assert_eq!(
        file_contents(&fixture),
        "server:\n    host: localhost\n    port: 8080\n"
    );
    assert_eq!(fixture.store.get("server.port"), Some(8080.into()));
}

#[test]
fn open_treats_malformed_files_as_empty() {
    let fixture = open_store_with_contents(Mode::Blocking, Some("a: [unclosed"));
    assert!(fixture.store.read().is_empty());
    assert_eq!(file_contents(&fixture), "{}\n");
}

#[test]
fn set_persists_across_reopen() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("user.name", "alice").unwrap();
    fixture.store.set("user.age", 30).unwrap();

    let reopened = DocumentStore::open(&fixture.path, Mode::Blocking).unwrap();
    assert_eq!(reopened.get("user.name"), Some("alice".into()));
    assert_eq!(reopened.get("user.age"), Some(30.into()));
}

#[test]
fn remove_persists_and_reports_the_old_value() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("a.b", 1).unwrap();
    fixture.store.set("a.c", 2).unwrap();

    assert_eq!(fixture.store.remove("a.b").unwrap(), Some(1.into()));
    assert_eq!(fixture.store.remove("a.b").unwrap(), None);
    assert_eq!(file_contents(&fixture), "a:\n    c: 2\n");
}

#[test]
fn get_descends_through_mappings_only() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("list", vec![Value::from(1)]).unwrap();
    assert_eq!(fixture.store.get("list.0"), None);
    assert!(fixture.store.get("list").is_some());
}

#[test]
fn blocking_save_failures_surface_to_the_caller() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing").join("store.yml");
    let err = DocumentStore::open(&path, Mode::Blocking).unwrap_err();
    assert!(err.is_io_error());
}

#[test]
fn load_picks_up_external_edits() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("stale", true).unwrap();

    std::fs::write(&fixture.path, "fresh: 1\n").unwrap();
    fixture.store.load().unwrap();

    assert_eq!(fixture.store.get("stale"), None);
    assert_eq!(fixture.store.get("fresh"), Some(1.into()));
}

#[test]
fn add_to_section_inserts_into_an_existing_mapping() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.create_section("users").unwrap();
    fixture
        .store
        .add_to_section("users", Some("alice"), 1)
        .unwrap();
    assert_eq!(fixture.store.get("users.alice"), Some(1.into()));
}

#[test]
fn add_to_section_without_a_key_fails_on_mappings() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.create_section("users").unwrap();
    let err = fixture.store.add_to_section("users", None, 1).unwrap_err();
    assert!(err.is_key_required());
    // The rejected value never reaches the file.
    assert_eq!(file_contents(&fixture), "users: {}\n");
}

#[test]
fn add_to_section_appends_to_sequences() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.create_sequence("tags").unwrap();
    fixture.store.add_to_section("tags", None, "red").unwrap();
    // A key is ignored when the section is a sequence.
    fixture
        .store
        .add_to_section("tags", Some("unused"), "blue")
        .unwrap();
    assert_eq!(file_contents(&fixture), "tags:\n    - red\n    - blue\n");
}

#[test]
fn add_to_section_replaces_scalars_and_absent_sections() {
    let fixture = open_store(Mode::Blocking);

    fixture.store.add_to_section("first", None, 1).unwrap();
    assert_eq!(fixture.store.get("first"), Some(vec![Value::from(1)].into()));

    fixture.store.set("second", "scalar").unwrap();
    fixture.store.add_to_section("second", Some("k"), 2).unwrap();
    assert_eq!(fixture.store.get("second.k"), Some(2.into()));
}

#[test]
fn create_section_is_a_no_op_on_existing_mappings() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("cfg.port", 80).unwrap();
    fixture.store.create_section("cfg").unwrap();
    assert_eq!(fixture.store.get("cfg.port"), Some(80.into()));
}

#[test]
fn create_section_paves_over_non_mappings() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("cfg", 5).unwrap();
    fixture.store.create_section("cfg").unwrap();
    assert!(fixture.store.has_section("cfg"));
    assert_eq!(file_contents(&fixture), "cfg: {}\n");
}

#[test]
fn create_section_accepts_dot_paths() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.create_section("a.b.c").unwrap();
    assert!(fixture.store.has_section("a.b.c"));
    assert_eq!(file_contents(&fixture), "a:\n    b:\n        c: {}\n");
}

#[test]
fn create_sequence_is_a_no_op_on_existing_sequences() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.create_sequence("tags").unwrap();
    fixture.store.add_to_section("tags", None, 1).unwrap();
    fixture.store.create_sequence("tags").unwrap();
    assert_eq!(file_contents(&fixture), "tags:\n    - 1\n");
}

#[test]
fn has_section_is_true_only_for_mappings() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("map.k", 1).unwrap();
    fixture.store.set("scalar", 2).unwrap();
    fixture.store.create_sequence("list").unwrap();

    assert!(fixture.store.has_section("map"));
    assert!(!fixture.store.has_section("scalar"));
    assert!(!fixture.store.has_section("list"));
    assert!(!fixture.store.has_section("absent"));
}

#[test]
fn rename_section_moves_the_subtree() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("old.a", 1).unwrap();
    fixture.store.set("old.b", 2).unwrap();

    fixture.store.rename_section("old", "new").unwrap();

    assert_eq!(fixture.store.get("old"), None);
    assert_eq!(fixture.store.get("new.a"), Some(1.into()));
    assert_eq!(fixture.store.get("new.b"), Some(2.into()));
    assert_eq!(file_contents(&fixture), "new:\n    a: 1\n    b: 2\n");
}

#[test]
fn rename_section_ignores_non_mappings() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("scalar", 1).unwrap();
    fixture.store.rename_section("scalar", "moved").unwrap();
    assert_eq!(fixture.store.get("scalar"), Some(1.into()));
    assert_eq!(fixture.store.get("moved"), None);
}

#[test]
fn empty_path_segments_address_real_keys() {
    let fixture = open_store(Mode::Blocking);
    fixture.store.set("user.", 1).unwrap();
    assert_eq!(fixture.store.get("user."), Some(1.into()));
    assert!(fixture.store.has_section("user"));
    assert_eq!(file_contents(&fixture), "user:\n    '': 1\n");
}
