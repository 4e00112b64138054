//! Integration tests for durable board state.
//!
//! Every successful action rewrites the snapshot, a reopened store sees the
//! latest state, and unusable records fall back to the default board.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;

use flowlane_core::codec;
use flowlane_core::model::DEFAULT_PROJECT_NAME;
use flowlane_core::storage::STORAGE_KEY;
use flowlane_core::{ColumnId, FileStorage, KeyValueStorage, MemoryStorage, ProjectStore};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn record_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    FileStorage::new(dir.path()).path_for(STORAGE_KEY).unwrap()
}

// ===========================================================================
// Round trips through the filesystem
// ===========================================================================

#[test]
fn reopened_store_sees_every_change() {
    let dir = tempfile::tempdir().unwrap();

    let (project_id, task_id) = {
        let mut store = ProjectStore::open(FileStorage::new(dir.path()));
        let project_id = store.add_project("Release");
        let task_id = store
            .add_task(ColumnId::Todo, "Tag build", Some("v1.0"))
            .unwrap();
        store
            .add_tag_to_task(&task_id, ColumnId::Todo, "ops")
            .unwrap();
        store
            .move_task(&task_id, ColumnId::Todo, ColumnId::InProgress, 0)
            .unwrap();
        (project_id, task_id)
    };

    let store = ProjectStore::open(FileStorage::new(dir.path()));
    assert_eq!(store.projects().len(), 2);
    assert_eq!(store.active_project_id(), Some(&project_id));
    let task = store.active_project().unwrap().task(&task_id).unwrap();
    assert_eq!(task.column_id, ColumnId::InProgress);
    assert_eq!(task.tags, ["ops"]);
    assert_eq!(task.description.as_deref(), Some("v1.0"));
    assert!(!store.is_dirty());
}

#[test]
fn stored_record_is_the_versioned_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ProjectStore::open(FileStorage::new(dir.path()));
    store.add_task(ColumnId::Done, "Shipped", None).unwrap();

    let raw = fs::read_to_string(record_path(&dir)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], codec::STATE_VERSION);
    let project = &value["state"]["projects"][0];
    assert_eq!(project["name"], DEFAULT_PROJECT_NAME);
    assert_eq!(project["columns"]["done"]["tasks"][0]["title"], "Shipped");
    assert_eq!(
        value["state"]["activeProjectId"],
        project["id"],
        "active project id points at the stored project"
    );
}

#[test]
fn empty_board_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = ProjectStore::open(FileStorage::new(dir.path()));
        let only = store.projects()[0].id.clone();
        store.delete_project(&only).unwrap();
    }
    let store = ProjectStore::open(FileStorage::new(dir.path()));
    assert!(store.projects().is_empty());
    assert!(store.active_project_id().is_none());
}

// ===========================================================================
// Fallbacks
// ===========================================================================

#[test]
fn corrupt_record_falls_back_to_default_board() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(record_path(&dir), "{ definitely not json").unwrap();

    let store = ProjectStore::open(FileStorage::new(dir.path()));
    assert_eq!(store.projects().len(), 1);
    assert_eq!(store.projects()[0].name, DEFAULT_PROJECT_NAME);
}

#[test]
fn future_version_falls_back_to_default_board() {
    let storage = MemoryStorage::with_entry(
        STORAGE_KEY,
        r#"{"state":{"projects":[],"activeProjectId":null},"version":3}"#,
    );
    let store = ProjectStore::open(storage);
    assert_eq!(store.projects()[0].name, DEFAULT_PROJECT_NAME);
}

#[test]
fn inconsistent_record_is_repaired_on_load() {
    let mut state = flowlane_core::AppState::default();
    let mut task = flowlane_core::Task::new(ColumnId::Todo, "misfiled", None);
    task.column_id = ColumnId::Done;
    state.projects[0].column_mut(ColumnId::Todo).tasks.push(task);
    state.active_project_id = Some(flowlane_core::ProjectId::new());
    let storage = MemoryStorage::with_entry(STORAGE_KEY, &codec::encode(&state).unwrap());

    let store = ProjectStore::open(storage);
    let project = store.active_project().expect("active project reassigned");
    assert_eq!(project.column(ColumnId::Todo).tasks[0].column_id, ColumnId::Todo);
}

#[test]
fn restored_tags_are_deduplicated_and_removable_verbatim() {
    let mut state = flowlane_core::AppState::default();
    let mut task = flowlane_core::Task::new(ColumnId::Todo, "tagged", None);
    task.tags = vec!["x".to_string(), "x".to_string(), " y ".to_string()];
    let id = task.id.clone();
    state.projects[0].column_mut(ColumnId::Todo).tasks.push(task);
    let storage = MemoryStorage::with_entry(STORAGE_KEY, &codec::encode(&state).unwrap());

    let mut store = ProjectStore::open(storage);
    let tags = |store: &ProjectStore<MemoryStorage>| {
        store.active_project().unwrap().task(&id).unwrap().tags.clone()
    };
    assert_eq!(tags(&store), ["x", " y "]);

    assert_eq!(store.remove_tag_from_task(&id, ColumnId::Todo, " y "), Ok(1));
    assert_eq!(store.remove_tag_from_task(&id, ColumnId::Todo, "x"), Ok(1));
    assert!(tags(&store).is_empty());
}

#[test]
fn unwritable_directory_keeps_working_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();

    let mut store = ProjectStore::open(FileStorage::new(&blocker));
    let id = store.add_task(ColumnId::Todo, "still here", None).unwrap();
    assert!(store.is_dirty());
    assert!(store.active_project().unwrap().task(&id).is_some());
    assert!(store.flush().is_err());
}

#[test]
fn failed_action_does_not_write() {
    let storage = MemoryStorage::new();
    let mut store = ProjectStore::open(storage.clone());
    let _ = store.rename_project(&flowlane_core::ProjectId::new(), "x");
    let _ = store.add_task(ColumnId::Todo, "", None);
    assert_eq!(storage.write_count(), 0);
    assert!(storage.get(STORAGE_KEY).unwrap().is_none());
}
