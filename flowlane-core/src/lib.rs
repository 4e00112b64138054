//! `FlowLane` core: board model, project store, drag resolution and
//! persistence.

pub mod codec;
pub mod filter;
pub mod model;
pub mod resolver;
pub mod storage;
pub mod store;

pub use filter::TitleFilter;
pub use model::{AppState, Column, ColumnId, Project, ProjectId, Task, TaskId};
pub use resolver::{DragItem, DragPhase, DropTarget, MoveRequest};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{ProjectStore, StoreError, TaskPatch};
