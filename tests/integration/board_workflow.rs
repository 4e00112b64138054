//! Integration tests for the project store: the board scenarios a user
//! walks through, end to end against in-memory storage.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use flowlane_core::model::DEFAULT_PROJECT_NAME;
use flowlane_core::{ColumnId, MemoryStorage, ProjectStore, StoreError, TaskId, TaskPatch};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn make_store() -> ProjectStore<MemoryStorage> {
    ProjectStore::open(MemoryStorage::new())
}

fn titles(store: &ProjectStore<MemoryStorage>, column: ColumnId) -> Vec<String> {
    store
        .active_project()
        .expect("active project")
        .column(column)
        .tasks
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

fn task_id_by_title(store: &ProjectStore<MemoryStorage>, title: &str) -> TaskId {
    store
        .active_project()
        .expect("active project")
        .columns
        .iter()
        .flat_map(|c| c.tasks.iter())
        .find(|t| t.title == title)
        .map(|t| t.id.clone())
        .expect("task exists")
}

// ===========================================================================
// Default board
// ===========================================================================

#[test]
fn fresh_store_has_default_project_with_empty_columns() {
    let store = make_store();
    let project = store.active_project().expect("default project");
    assert_eq!(project.name, DEFAULT_PROJECT_NAME);
    for column in ColumnId::ALL {
        assert!(project.column(column).is_empty());
    }
}

// ===========================================================================
// Add then move across columns
// ===========================================================================

#[test]
fn add_two_then_move_newest_to_done() {
    let mut store = make_store();
    store.add_task(ColumnId::Todo, "A", None).unwrap();
    let b = store.add_task(ColumnId::Todo, "B", None).unwrap();
    assert_eq!(titles(&store, ColumnId::Todo), ["B", "A"]);

    store
        .move_task(&b, ColumnId::Todo, ColumnId::Done, 0)
        .unwrap();

    assert_eq!(titles(&store, ColumnId::Todo), ["A"]);
    assert_eq!(titles(&store, ColumnId::Done), ["B"]);
    let moved = store.active_project().unwrap().task(&b).unwrap();
    assert_eq!(moved.column_id, ColumnId::Done);
}

#[test]
fn move_with_oversized_index_appends() {
    let mut store = make_store();
    store.add_task(ColumnId::InProgress, "X", None).unwrap();
    store.add_task(ColumnId::InProgress, "Y", None).unwrap();
    let a = store.add_task(ColumnId::Todo, "A", None).unwrap();

    store
        .move_task(&a, ColumnId::Todo, ColumnId::InProgress, 1_000)
        .unwrap();

    assert_eq!(titles(&store, ColumnId::InProgress), ["Y", "X", "A"]);
}

// ===========================================================================
// Project lifecycle
// ===========================================================================

#[test]
fn deleting_only_project_disables_task_actions() {
    let mut store = make_store();
    let only = store.projects()[0].id.clone();
    store.delete_project(&only).unwrap();

    assert!(store.projects().is_empty());
    assert!(store.active_project_id().is_none());
    assert_eq!(
        store.add_task(ColumnId::Todo, "nowhere", None),
        Err(StoreError::NoActiveProject)
    );
    assert_eq!(
        store.clear_column(ColumnId::Todo),
        Err(StoreError::NoActiveProject)
    );
}

#[test]
fn projects_keep_independent_boards() {
    let mut store = make_store();
    let first = store.projects()[0].id.clone();
    store.add_task(ColumnId::Todo, "first-only", None).unwrap();

    let second = store.add_project("Second");
    assert!(titles(&store, ColumnId::Todo).is_empty());
    store.add_task(ColumnId::Todo, "second-only", None).unwrap();

    store.set_active_project(&first).unwrap();
    assert_eq!(titles(&store, ColumnId::Todo), ["first-only"]);
    store.set_active_project(&second).unwrap();
    assert_eq!(titles(&store, ColumnId::Todo), ["second-only"]);
}

#[test]
fn project_order_is_creation_order() {
    let mut store = make_store();
    store.add_project("B");
    store.add_project("A");
    let names: Vec<&str> = store.projects().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, [DEFAULT_PROJECT_NAME, "B", "A"]);
}

// ===========================================================================
// Editing and tagging
// ===========================================================================

#[test]
fn edit_then_tag_then_clear() {
    let mut store = make_store();
    store
        .add_task(ColumnId::InProgress, "Draft", Some("first pass"))
        .unwrap();
    let id = task_id_by_title(&store, "Draft");

    store
        .update_task(
            &id,
            ColumnId::InProgress,
            TaskPatch::default().title("Final"),
        )
        .unwrap();
    store
        .add_tag_to_task(&id, ColumnId::InProgress, "docs")
        .unwrap();
    store
        .add_tag_to_task(&id, ColumnId::InProgress, "docs")
        .unwrap();

    let task = store.active_project().unwrap().task(&id).unwrap();
    assert_eq!(task.title, "Final");
    assert_eq!(task.description.as_deref(), Some("first pass"));
    assert_eq!(task.tags, ["docs"]);
    assert_eq!(task.column_id, ColumnId::InProgress);

    assert_eq!(store.clear_column(ColumnId::InProgress), Ok(1));
    assert!(store.active_project().unwrap().task(&id).is_none());
}

#[test]
fn update_rejects_invalid_patch_without_partial_apply() {
    let mut store = make_store();
    let id = store.add_task(ColumnId::Todo, "Keep", None).unwrap();
    let patch = TaskPatch::default()
        .title("Changed")
        .description(Some("d".repeat(501)));

    assert_eq!(
        store.update_task(&id, ColumnId::Todo, patch),
        Err(StoreError::DescriptionTooLong)
    );
    assert_eq!(titles(&store, ColumnId::Todo), ["Keep"]);
}

#[test]
fn actions_on_deleted_task_are_rejected_and_harmless() {
    let mut store = make_store();
    let id = store.add_task(ColumnId::Todo, "gone", None).unwrap();
    store.delete_task(&id, ColumnId::Todo).unwrap();
    let before = store.state().clone();

    assert!(store.delete_task(&id, ColumnId::Todo).is_err());
    assert!(
        store
            .update_task(&id, ColumnId::Todo, TaskPatch::default().title("x"))
            .is_err()
    );
    assert!(store.add_tag_to_task(&id, ColumnId::Todo, "x").is_err());
    assert!(store.remove_tag_from_task(&id, ColumnId::Todo, "x").is_err());
    assert!(
        store
            .move_task(&id, ColumnId::Todo, ColumnId::Done, 0)
            .is_err()
    );
    assert_eq!(store.state(), &before);
}
