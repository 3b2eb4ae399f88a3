//! Tests for the background persistence mode.

use canopy::Mode;

use crate::helpers::{file_contents, open_store, open_store_with_contents};

#[test]
fn open_writes_the_file_after_a_flush() {
    let fixture = open_store(Mode::Background);
    fixture.store.flush().unwrap();
    assert_eq!(file_contents(&fixture), "{}\n");
}

#[test]
fn mutations_reach_the_file_in_submission_order() {
    let fixture = open_store(Mode::Background);
    fixture.store.set("counter", 1).unwrap();
    fixture.store.set("counter", 2).unwrap();
    fixture.store.set("counter", 3).unwrap();
    fixture.store.flush().unwrap();
    assert_eq!(file_contents(&fixture), "counter: 3\n");
}

#[test]
fn saves_snapshot_the_tree_at_call_time() {
    let fixture = open_store(Mode::Background);
    fixture.store.set("a", 1).unwrap();
    fixture.store.set("b", 2).unwrap();
    fixture.store.flush().unwrap();

    // Reads are always served from memory, even before a flush.
    assert_eq!(fixture.store.get("a"), Some(1.into()));
    assert_eq!(file_contents(&fixture), "a: 1\nb: 2\n");
}

#[test]
fn load_applies_after_a_flush() {
    let fixture = open_store(Mode::Background);
    fixture.store.set("stale", true).unwrap();
    fixture.store.flush().unwrap();

    std::fs::write(&fixture.path, "fresh: 1\n").unwrap();
    fixture.store.load().unwrap();
    fixture.store.flush().unwrap();

    assert_eq!(fixture.store.get("stale"), None);
    assert_eq!(fixture.store.get("fresh"), Some(1.into()));
}

#[test]
fn mutations_after_open_survive_the_initial_load() {
    // The load queued by open must be applied before open returns;
    // otherwise it would land later and wipe this set.
    let fixture = open_store_with_contents(Mode::Background, Some("seeded: true\n"));
    fixture.store.set("added", 1).unwrap();
    fixture.store.flush().unwrap();

    assert_eq!(fixture.store.get("seeded"), Some(true.into()));
    assert_eq!(fixture.store.get("added"), Some(1.into()));
    assert_eq!(file_contents(&fixture), "seeded: true\nadded: 1\n");
}

#[test]
fn open_never_clobbers_an_existing_file_with_an_empty_document() {
    let fixture = open_store_with_contents(Mode::Background, Some("kept: 1\n"));
    fixture.store.flush().unwrap();
    assert_eq!(file_contents(&fixture), "kept: 1\n");
}

#[test]
fn open_loads_existing_contents() {
    let fixture = open_store_with_contents(Mode::Background, Some("server:\n  port: 8080\n"));
    fixture.store.flush().unwrap();
    assert_eq!(fixture.store.get("server.port"), Some(8080.into()));
    assert_eq!(file_contents(&fixture), "server:\n    port: 8080\n");
}

#[test]
fn drop_drains_queued_writes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("store.yml");
    {
        let store = canopy::DocumentStore::open(&path, Mode::Background).unwrap();
        store.set("persisted.at", "drop").unwrap();
    }
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "persisted:\n    at: drop\n");
}

#[test]
fn io_failures_do_not_surface_in_background_mode() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing").join("store.yml");
    // The directory does not exist, so every save fails, but the
    // fire-and-forget contract keeps the API happy.
    let store = canopy::DocumentStore::open(&path, Mode::Background).unwrap();
    store.set("k", 1).unwrap();
    store.flush().unwrap();
    assert!(!path.exists());
}
