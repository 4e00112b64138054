//! Integration tests for drag-and-drop resolution through the store.
//!
//! Simulates the event stream of a pointer drag: repeated hover events
//! followed by a drop, including stale and out-of-bounds gestures.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use flowlane_core::resolver::resolve;
use flowlane_core::{
    ColumnId, DragItem, DragPhase, DropTarget, MemoryStorage, ProjectStore, TaskId, TitleFilter,
};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Store whose active project has todo = [A, B, C] and done = [X, Y].
fn make_board() -> ProjectStore<MemoryStorage> {
    let mut store = ProjectStore::open(MemoryStorage::new());
    for title in ["C", "B", "A"] {
        store.add_task(ColumnId::Todo, title, None).unwrap();
    }
    for title in ["Y", "X"] {
        store.add_task(ColumnId::Done, title, None).unwrap();
    }
    store
}

fn id_of(store: &ProjectStore<MemoryStorage>, title: &str) -> TaskId {
    store
        .active_project()
        .unwrap()
        .columns
        .iter()
        .flat_map(|c| c.tasks.iter())
        .find(|t| t.title == title)
        .map(|t| t.id.clone())
        .expect("task exists")
}

fn titles(store: &ProjectStore<MemoryStorage>, column: ColumnId) -> Vec<String> {
    store
        .active_project()
        .unwrap()
        .column(column)
        .tasks
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

fn dragging(store: &ProjectStore<MemoryStorage>, title: &str) -> DragItem {
    let id = id_of(store, title);
    let (column_id, _) = store.active_project().unwrap().locate_task(&id).unwrap();
    DragItem::Task { id, column_id }
}

fn over_task(store: &ProjectStore<MemoryStorage>, title: &str) -> DropTarget {
    let id = id_of(store, title);
    let (column_id, _) = store.active_project().unwrap().locate_task(&id).unwrap();
    DropTarget::Task { id, column_id }
}

fn total_tasks(store: &ProjectStore<MemoryStorage>) -> usize {
    store.active_project().unwrap().task_count()
}

// ===========================================================================
// Cross-column drags
// ===========================================================================

#[test]
fn hover_previews_cross_column_move_then_drop_finalizes_position() {
    let mut store = make_board();
    let b = dragging(&store, "B");

    // Pointer enters Done over Y: hover commits the cross-column preview.
    let target = over_task(&store, "Y");
    let request = store.drag(DragPhase::Over, &b, Some(&target)).unwrap();
    assert_eq!(request.dest, ColumnId::Done);
    assert_eq!(titles(&store, ColumnId::Done), ["X", "B", "Y"]);
    assert_eq!(titles(&store, ColumnId::Todo), ["A", "C"]);

    // Repeated hover events over the same target are now same-column: ignored.
    let b = dragging(&store, "B");
    let target = over_task(&store, "Y");
    assert!(store.drag(DragPhase::Over, &b, Some(&target)).is_none());

    // Drop on Y: reorder within Done, landing after Y.
    store.drag(DragPhase::End, &b, Some(&target)).unwrap();
    assert_eq!(titles(&store, ColumnId::Done), ["X", "Y", "B"]);
    assert_eq!(total_tasks(&store), 5);
}

#[test]
fn drop_on_empty_column_appends() {
    let mut store = make_board();
    let a = dragging(&store, "A");
    let target = DropTarget::Column(ColumnId::InProgress);
    store.drag(DragPhase::End, &a, Some(&target)).unwrap();
    assert_eq!(titles(&store, ColumnId::InProgress), ["A"]);

    let c = dragging(&store, "C");
    store.drag(DragPhase::Over, &c, Some(&target)).unwrap();
    assert_eq!(titles(&store, ColumnId::InProgress), ["A", "C"]);
}

// ===========================================================================
// Same-column reorders
// ===========================================================================

#[test]
fn same_column_drop_moves_down_and_up() {
    let mut store = make_board();

    let a = dragging(&store, "A");
    let over_c = over_task(&store, "C");
    store.drag(DragPhase::End, &a, Some(&over_c)).unwrap();
    assert_eq!(titles(&store, ColumnId::Todo), ["B", "C", "A"]);

    let a = dragging(&store, "A");
    let over_b = over_task(&store, "B");
    store.drag(DragPhase::End, &a, Some(&over_b)).unwrap();
    assert_eq!(titles(&store, ColumnId::Todo), ["A", "B", "C"]);
}

#[test]
fn same_column_hover_never_moves() {
    let mut store = make_board();
    let a = dragging(&store, "A");
    for title in ["B", "C", "B"] {
        let target = over_task(&store, title);
        assert!(store.drag(DragPhase::Over, &a, Some(&target)).is_none());
    }
    assert_eq!(titles(&store, ColumnId::Todo), ["A", "B", "C"]);
}

// ===========================================================================
// Ignored gestures
// ===========================================================================

#[test]
fn dropping_outside_or_on_self_changes_nothing() {
    let mut store = make_board();
    let before = store.state().clone();
    let a = dragging(&store, "A");
    let self_target = over_task(&store, "A");

    assert!(store.drag(DragPhase::End, &a, None).is_none());
    assert!(store.drag(DragPhase::End, &a, Some(&self_target)).is_none());
    assert!(
        store
            .drag(
                DragPhase::End,
                &DragItem::Other,
                Some(&DropTarget::Column(ColumnId::Done))
            )
            .is_none()
    );
    assert_eq!(store.state(), &before);
}

#[test]
fn stale_drag_after_delete_is_ignored() {
    let mut store = make_board();
    let a = dragging(&store, "A");
    let a_id = id_of(&store, "A");
    store.delete_task(&a_id, ColumnId::Todo).unwrap();
    let writes = store.storage().write_count();

    let target = DropTarget::Column(ColumnId::Done);
    assert!(store.drag(DragPhase::End, &a, Some(&target)).is_none());
    assert_eq!(store.storage().write_count(), writes);
}

#[test]
fn target_deleted_mid_drag_falls_back_to_append() {
    let mut store = make_board();
    let a = dragging(&store, "A");
    let over_x = over_task(&store, "X");
    let x_id = id_of(&store, "X");
    store.delete_task(&x_id, ColumnId::Done).unwrap();

    store.drag(DragPhase::End, &a, Some(&over_x)).unwrap();
    assert_eq!(titles(&store, ColumnId::Done), ["Y", "A"]);
}

// ===========================================================================
// Filtered views
// ===========================================================================

#[test]
fn targets_from_filtered_view_resolve_against_full_column() {
    let mut store = make_board();
    let x = dragging(&store, "X");
    // Only C is visible in Todo; in the full column it sits at index 2.
    let target = {
        let view = TitleFilter::new("c").apply(store.active_project().unwrap());
        let visible = &view.column(ColumnId::Todo).tasks[0];
        DropTarget::Task {
            id: visible.id.clone(),
            column_id: ColumnId::Todo,
        }
    };

    let project = store.active_project().unwrap();
    let request = resolve(project, DragPhase::Over, &x, Some(&target)).unwrap();
    assert_eq!(request.dest_index, 2);

    store.drag(DragPhase::Over, &x, Some(&target)).unwrap();
    assert_eq!(titles(&store, ColumnId::Todo), ["A", "B", "X", "C"]);
}
