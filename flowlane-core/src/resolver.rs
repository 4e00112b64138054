//! Drag-and-drop interpretation.
//!
//! A drag gesture reports what is being dragged ([`DragItem`]) and what it is
//! currently over ([`DropTarget`]). [`resolve`] turns that pair into a
//! [`MoveRequest`] for [`ProjectStore::move_task`], or `None` when the
//! gesture should be ignored.
//!
//! Hover events ([`DragPhase::Over`]) only produce cross-column moves so the
//! card follows the pointer into another column. The drop
//! ([`DragPhase::End`]) produces any resolvable move, including reorders
//! within one column.

use tracing::debug;

use crate::model::{ColumnId, Project, TaskId};
use crate::storage::KeyValueStorage;
use crate::store::ProjectStore;

/// The element being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    /// A task card, with the column it was last seen in.
    Task {
        /// Task being dragged.
        id: TaskId,
        /// Column the card was in when the descriptor was built.
        column_id: ColumnId,
    },
    /// Anything else; never produces a move.
    Other,
}

/// The droppable element under the dragged item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty space in a column.
    Column(ColumnId),
    /// Another task card.
    Task {
        /// Task under the pointer.
        id: TaskId,
        /// Column that card was in when the descriptor was built.
        column_id: ColumnId,
    },
}

/// Which part of the gesture an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Hovering while the drag is in progress.
    Over,
    /// The item was dropped.
    End,
}

/// A resolved move, ready for [`ProjectStore::move_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// Task to move.
    pub task_id: TaskId,
    /// Column currently holding the task.
    pub source: ColumnId,
    /// Column to move into.
    pub dest: ColumnId,
    /// Insertion index in `dest`.
    pub dest_index: usize,
}

/// Resolves a drag event against `project`.
///
/// Positions are looked up in `project` itself rather than trusted from the
/// descriptors, so pass the stored project, not a filtered view. Returns
/// `None` when the dragged item is not a task, the task is no longer on the
/// board, there is no target, the task is over itself, or a hover stays
/// within one column.
#[must_use]
pub fn resolve(
    project: &Project,
    phase: DragPhase,
    active: &DragItem,
    over: Option<&DropTarget>,
) -> Option<MoveRequest> {
    let DragItem::Task { id: task_id, .. } = active else {
        return None;
    };
    let (source, _) = project.locate_task(task_id)?;

    let (dest, dest_index) = match over? {
        DropTarget::Column(column_id) => (*column_id, project.column(*column_id).len()),
        DropTarget::Task { id, column_id } => {
            if id == task_id {
                return None;
            }
            project.locate_task(id).unwrap_or_else(|| {
                // The target vanished mid-drag; append to its last known column.
                (*column_id, project.column(*column_id).len())
            })
        }
    };

    if phase == DragPhase::Over && dest == source {
        return None;
    }

    Some(MoveRequest {
        task_id: task_id.clone(),
        source,
        dest,
        dest_index,
    })
}

impl<S: KeyValueStorage> ProjectStore<S> {
    /// Resolves a drag event against the active project and applies it.
    ///
    /// Returns the move that was applied, or `None` if the event was
    /// ignored. Stale references are never an error here.
    pub fn drag(
        &mut self,
        phase: DragPhase,
        active: &DragItem,
        over: Option<&DropTarget>,
    ) -> Option<MoveRequest> {
        let request = resolve(self.active_project()?, phase, active, over)?;
        match self.move_task(
            &request.task_id,
            request.source,
            request.dest,
            request.dest_index,
        ) {
            Ok(()) => Some(request),
            Err(err) => {
                debug!(error = %err, ?phase, "ignoring stale drag event");
                None
            }
        }
    }
}
