//! The project store: board state plus the actions that mutate it.
//!
//! [`ProjectStore`] is owned by the application root and handed to whatever
//! renders the board. Every action that finds its target mutates the state
//! and then writes the whole snapshot back to storage. Actions whose target
//! no longer exists return a [`StoreError`] and change nothing; callers that
//! treat such races as expected (drag handling, the TUI) simply ignore it.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codec;
use crate::model::{
    AppState, ColumnId, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, Project, ProjectId, Task, TaskId,
};
use crate::storage::{KeyValueStorage, STORAGE_KEY, StorageError, load_state};

/// Errors that can occur during store actions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The action needs an active project and there is none.
    #[error("no active project")]
    NoActiveProject,
    /// Project with the given ID was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// Task with the given ID was not found in the named column.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// Task title cannot be empty.
    #[error("Title is required")]
    TitleEmpty,
    /// Task title exceeds the maximum length.
    #[error("Title must be at most {} characters", MAX_TITLE_LENGTH)]
    TitleTooLong,
    /// Task description exceeds the maximum length.
    #[error("Description must be at most {} characters", MAX_DESCRIPTION_LENGTH)]
    DescriptionTooLong,
}

impl StoreError {
    /// Whether the action failed because its target no longer exists, as
    /// opposed to being rejected by validation.
    #[must_use]
    pub const fn is_missing_target(&self) -> bool {
        matches!(
            self,
            Self::NoActiveProject | Self::ProjectNotFound(_) | Self::TaskNotFound(_)
        )
    }
}

/// Checks a task title against the board limits.
///
/// # Errors
///
/// Returns [`StoreError::TitleEmpty`] for blank titles and
/// [`StoreError::TitleTooLong`] past [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::TitleEmpty);
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(StoreError::TitleTooLong);
    }
    Ok(())
}

/// Checks a task description against the board limits.
///
/// # Errors
///
/// Returns [`StoreError::DescriptionTooLong`] past
/// [`MAX_DESCRIPTION_LENGTH`] characters.
pub fn validate_description(description: &str) -> Result<(), StoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(StoreError::DescriptionTooLong);
    }
    Ok(())
}

/// An empty description is the same as none.
fn normalize_description(description: Option<&str>) -> Option<String> {
    description.filter(|d| !d.is_empty()).map(str::to_string)
}

/// Partial update for [`ProjectStore::update_task`].
///
/// Only title and description can be patched; column and tags are changed
/// through their own actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description (`Some(None)` clears it), if changing.
    pub description: Option<Option<String>>,
}

impl TaskPatch {
    /// Sets the new title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the new description.
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }
}

/// Owns the board state and persists it after every successful action.
pub struct ProjectStore<S: KeyValueStorage> {
    state: AppState,
    storage: S,
    /// Set when the last write failed; cleared by the next good write.
    dirty: bool,
}

impl<S: KeyValueStorage> ProjectStore<S> {
    /// Opens the store, restoring the board from `storage`.
    ///
    /// Missing or corrupt snapshots fall back to the default board.
    pub fn open(storage: S) -> Self {
        let state = load_state(&storage);
        Self {
            state,
            storage,
            dirty: false,
        }
    }

    /// Creates a store around an explicit state without touching storage.
    pub const fn with_state(storage: S, state: AppState) -> Self {
        Self {
            state,
            storage,
            dirty: false,
        }
    }

    /// The full board state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Projects in creation order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    /// Id of the active project, if any.
    #[must_use]
    pub const fn active_project_id(&self) -> Option<&ProjectId> {
        self.state.active_project_id.as_ref()
    }

    /// The active project, if any.
    #[must_use]
    pub fn active_project(&self) -> Option<&Project> {
        self.state.active_project()
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the stored snapshot is behind the in-memory state.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the full snapshot to storage now.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails; the store stays dirty.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let raw = codec::encode(&self.state).inspect_err(|_| self.dirty = true)?;
        match self.storage.set(STORAGE_KEY, &raw) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                self.dirty = true;
                Err(err)
            }
        }
    }

    /// Save after a mutation. A failed write never fails the action.
    fn persist(&mut self) {
        if let Err(err) = self.flush() {
            warn!(error = %err, "board changed but could not be saved");
        }
    }

    fn active_mut(&mut self) -> Result<&mut Project, StoreError> {
        self.state
            .active_project_mut()
            .ok_or(StoreError::NoActiveProject)
    }

    fn task_mut(&mut self, task_id: &TaskId, column_id: ColumnId) -> Result<&mut Task, StoreError> {
        self.active_mut()?
            .column_mut(column_id)
            .task_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))
    }

    // --- project actions ---

    /// Appends a new project with three empty columns and makes it active.
    ///
    /// The name is stored as given; callers trim and reject blanks.
    pub fn add_project(&mut self, name: &str) -> ProjectId {
        let project = Project::new(name);
        let id = project.id.clone();
        self.state.projects.push(project);
        self.state.active_project_id = Some(id.clone());
        info!(project_id = %id, "project added");
        self.persist();
        id
    }

    /// Renames a project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] if the project does not exist.
    pub fn rename_project(&mut self, project_id: &ProjectId, new_name: &str) -> Result<(), StoreError> {
        let project = self
            .state
            .project_mut(project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.clone()))?;
        project.name = new_name.to_string();
        self.persist();
        Ok(())
    }

    /// Removes a project. If it was active, the first remaining project
    /// becomes active, or none if no projects remain.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] if the project does not exist.
    pub fn delete_project(&mut self, project_id: &ProjectId) -> Result<(), StoreError> {
        let idx = self
            .state
            .projects
            .iter()
            .position(|p| &p.id == project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.clone()))?;
        self.state.projects.remove(idx);

        if self.state.active_project_id.as_ref() == Some(project_id) {
            self.state.active_project_id = self.state.projects.first().map(|p| p.id.clone());
        }
        info!(project_id = %project_id, remaining = self.state.projects.len(), "project deleted");
        self.persist();
        Ok(())
    }

    /// Makes a project the active one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] for ids that do not exist;
    /// the active project is left unchanged.
    pub fn set_active_project(&mut self, project_id: &ProjectId) -> Result<(), StoreError> {
        if self.state.project(project_id).is_none() {
            return Err(StoreError::ProjectNotFound(project_id.clone()));
        }
        self.state.active_project_id = Some(project_id.clone());
        self.persist();
        Ok(())
    }

    // --- task actions ---

    /// Creates a task at the top of a column of the active project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoActiveProject`] without an active project,
    /// or a validation error for an invalid title or description.
    pub fn add_task(
        &mut self,
        column_id: ColumnId,
        title: &str,
        description: Option<&str>,
    ) -> Result<TaskId, StoreError> {
        self.active_mut()?;
        validate_title(title)?;
        if let Some(description) = description {
            validate_description(description)?;
        }

        let task = Task::new(column_id, title, normalize_description(description));
        let id = task.id.clone();
        self.active_mut()?.column_mut(column_id).tasks.insert(0, task);
        debug!(task_id = %id, column = %column_id, "task added");
        self.persist();
        Ok(id)
    }

    /// Applies a title/description patch to a task.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the task is not in `column_id` of the
    /// active project, or a validation error for invalid new values.
    pub fn update_task(
        &mut self,
        task_id: &TaskId,
        column_id: ColumnId,
        patch: TaskPatch,
    ) -> Result<(), StoreError> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        if let Some(Some(description)) = &patch.description {
            validate_description(description)?;
        }

        let task = self.task_mut(task_id, column_id)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = normalize_description(description.as_deref());
        }
        self.persist();
        Ok(())
    }

    /// Removes a task from a column, returning it.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the task is not in `column_id` of the
    /// active project.
    pub fn delete_task(&mut self, task_id: &TaskId, column_id: ColumnId) -> Result<Task, StoreError> {
        let column = self.active_mut()?.column_mut(column_id);
        let idx = column
            .position(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
        let task = column.tasks.remove(idx);
        debug!(task_id = %task_id, column = %column_id, "task deleted");
        self.persist();
        Ok(task)
    }

    /// Moves a task within or between columns of the active project.
    ///
    /// The task is removed from `source` first, so for a move within one
    /// column `dest_index` addresses the sequence without the task. An index
    /// past the end appends.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the task is not in `source` of the active
    /// project (for example a stale drag event).
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        source: ColumnId,
        dest: ColumnId,
        dest_index: usize,
    ) -> Result<(), StoreError> {
        let project = self.active_mut()?;
        let source_column = project.column_mut(source);
        let idx = source_column
            .position(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
        let mut task = source_column.tasks.remove(idx);
        task.column_id = dest;

        let dest_tasks = &mut project.column_mut(dest).tasks;
        let at = dest_index.min(dest_tasks.len());
        dest_tasks.insert(at, task);

        debug!(task_id = %task_id, from = %source, to = %dest, index = at, "task moved");
        self.persist();
        Ok(())
    }

    /// Removes every task from a column of the active project, returning
    /// how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoActiveProject`] without an active project.
    pub fn clear_column(&mut self, column_id: ColumnId) -> Result<usize, StoreError> {
        let removed = std::mem::take(&mut self.active_mut()?.column_mut(column_id).tasks).len();
        debug!(column = %column_id, removed, "column cleared");
        self.persist();
        Ok(removed)
    }

    // --- tag actions ---

    /// Adds a tag to a task unless it already has it. Returns whether the
    /// tag was added. Blank tags are ignored.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the task is not in `column_id` of the
    /// active project.
    pub fn add_tag_to_task(
        &mut self,
        task_id: &TaskId,
        column_id: ColumnId,
        tag: &str,
    ) -> Result<bool, StoreError> {
        let tag = tag.trim();
        let task = self.task_mut(task_id, column_id)?;
        let added = !tag.is_empty() && !task.has_tag(tag);
        if added {
            task.tags.push(tag.to_string());
        }
        self.persist();
        Ok(added)
    }

    /// Removes every tag equal to `tag` from a task, returning how many
    /// were removed. Matching is exact, surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the task is not in `column_id` of the
    /// active project.
    pub fn remove_tag_from_task(
        &mut self,
        task_id: &TaskId,
        column_id: ColumnId,
        tag: &str,
    ) -> Result<usize, StoreError> {
        let task = self.task_mut(task_id, column_id)?;
        let before = task.tags.len();
        task.tags.retain(|t| t != tag);
        let removed = before - task.tags.len();
        self.persist();
        Ok(removed)
    }
}
