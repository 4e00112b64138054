//! Board data model for `FlowLane`.
//!
//! A board is an ordered list of projects. Every project owns exactly three
//! columns (To Do, In Progress, Done) and every task sits in exactly one of
//! them, carrying that column's id in [`Task::column_id`].

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum allowed task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Name of the project created when no saved board exists.
pub const DEFAULT_PROJECT_NAME: &str = "My First Project";

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new time-ordered project identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the three fixed columns of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnId {
    /// Work not yet started.
    #[serde(rename = "todo")]
    Todo,
    /// Work underway.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Finished work.
    #[serde(rename = "done")]
    Done,
}

impl ColumnId {
    /// All columns in board order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire identifier (`todo`, `in-progress`, `done`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Human-readable column title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// The column to the right, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Todo => Some(Self::InProgress),
            Self::InProgress => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// The column to the left, if any.
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self {
            Self::Todo => None,
            Self::InProgress => Some(Self::Todo),
            Self::Done => Some(Self::InProgress),
        }
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a column id that is not one of the fixed three.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column: {0}")]
pub struct UnknownColumn(pub String);

impl FromStr for ColumnId {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

/// A single card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, stable task identifier.
    pub id: TaskId,
    /// Task title (non-empty, at most [`MAX_TITLE_LENGTH`] characters).
    pub title: String,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// Tags in insertion order, without duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Column currently holding this task.
    pub column_id: ColumnId,
}

impl Task {
    /// Creates a task with a fresh id, the current timestamp and no tags.
    #[must_use]
    pub fn new(column_id: ColumnId, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description,
            created_at: Utc::now(),
            tags: Vec::new(),
            column_id,
        }
    }

    /// Whether the task carries exactly this tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// An ordered sequence of tasks under one of the fixed column ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Which fixed column this is.
    pub id: ColumnId,
    /// Display title.
    pub title: String,
    /// Tasks in user-controlled order, first is topmost.
    pub tasks: Vec<Task>,
}

impl Column {
    /// Creates an empty column with its standard title.
    #[must_use]
    pub fn new(id: ColumnId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            tasks: Vec::new(),
        }
    }

    /// Index of the task with the given id.
    #[must_use]
    pub fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == task_id)
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == task_id)
    }

    /// Looks up a task by id for mutation.
    pub fn task_mut(&mut self, task_id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == task_id)
    }

    /// Number of tasks in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the column holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// The three columns of a project.
///
/// Serialized as an object keyed by column id, so a stored project can never
/// be missing a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    todo: Column,
    #[serde(rename = "in-progress")]
    in_progress: Column,
    done: Column,
}

impl Columns {
    /// Three empty columns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            todo: Column::new(ColumnId::Todo),
            in_progress: Column::new(ColumnId::InProgress),
            done: Column::new(ColumnId::Done),
        }
    }

    /// The column with the given id.
    #[must_use]
    pub const fn get(&self, id: ColumnId) -> &Column {
        match id {
            ColumnId::Todo => &self.todo,
            ColumnId::InProgress => &self.in_progress,
            ColumnId::Done => &self.done,
        }
    }

    /// The column with the given id, for mutation.
    pub const fn get_mut(&mut self, id: ColumnId) -> &mut Column {
        match id {
            ColumnId::Todo => &mut self.todo,
            ColumnId::InProgress => &mut self.in_progress,
            ColumnId::Done => &mut self.done,
        }
    }

    /// Columns in board order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        [&self.todo, &self.in_progress, &self.done].into_iter()
    }

    /// Columns in board order, for mutation.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        [&mut self.todo, &mut self.in_progress, &mut self.done].into_iter()
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::new()
    }
}

/// An independent board with its own three columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// The fixed To Do / In Progress / Done columns.
    pub columns: Columns,
}

impl Project {
    /// Creates a project with a fresh id and three empty columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            columns: Columns::new(),
        }
    }

    /// The column with the given id.
    #[must_use]
    pub const fn column(&self, id: ColumnId) -> &Column {
        self.columns.get(id)
    }

    /// The column with the given id, for mutation.
    pub const fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        self.columns.get_mut(id)
    }

    /// Finds which column holds a task and at which index.
    #[must_use]
    pub fn locate_task(&self, task_id: &TaskId) -> Option<(ColumnId, usize)> {
        self.columns
            .iter()
            .find_map(|column| column.position(task_id).map(|idx| (column.id, idx)))
    }

    /// Looks up a task in any column.
    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.columns.iter().find_map(|column| column.task(task_id))
    }

    /// Total number of tasks across all three columns.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }
}

/// The whole persisted board: every project plus the active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Projects in creation order.
    pub projects: Vec<Project>,
    /// The project currently displayed, if any.
    pub active_project_id: Option<ProjectId>,
}

impl AppState {
    /// A state with no projects at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            projects: Vec::new(),
            active_project_id: None,
        }
    }

    /// Looks up a project by id.
    #[must_use]
    pub fn project(&self, project_id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == project_id)
    }

    /// Looks up a project by id for mutation.
    pub fn project_mut(&mut self, project_id: &ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| &p.id == project_id)
    }

    /// The active project, if one is set and exists.
    #[must_use]
    pub fn active_project(&self) -> Option<&Project> {
        self.active_project_id
            .as_ref()
            .and_then(|id| self.project(id))
    }

    /// The active project for mutation.
    pub fn active_project_mut(&mut self) -> Option<&mut Project> {
        let id = self.active_project_id.clone()?;
        self.project_mut(&id)
    }

    /// Repairs a snapshot restored from storage so that the board
    /// invariants hold again.
    ///
    /// Column slots get their own id back, each task's `column_id` is reset
    /// to the column holding it, repeated task ids within a project and
    /// repeated tags within a task keep only their first occurrence, and a
    /// dangling active project falls back to the first project. Returns the
    /// number of repairs made.
    pub fn normalize(&mut self) -> usize {
        let mut repairs = 0;

        for project in &mut self.projects {
            let mut seen = HashSet::new();
            for column_id in ColumnId::ALL {
                let column = project.columns.get_mut(column_id);
                if column.id != column_id {
                    column.id = column_id;
                    repairs += 1;
                }

                let before = column.tasks.len();
                column.tasks.retain(|task| seen.insert(task.id.clone()));
                repairs += before - column.tasks.len();

                for task in &mut column.tasks {
                    if task.column_id != column_id {
                        task.column_id = column_id;
                        repairs += 1;
                    }

                    let mut tags = HashSet::new();
                    let before = task.tags.len();
                    task.tags.retain(|tag| tags.insert(tag.clone()));
                    repairs += before - task.tags.len();
                }
            }
        }

        let dangling = self
            .active_project_id
            .as_ref()
            .is_some_and(|id| self.project(id).is_none());
        if dangling {
            self.active_project_id = self.projects.first().map(|p| p.id.clone());
            repairs += 1;
        }

        repairs
    }
}

impl Default for AppState {
    /// One empty project named [`DEFAULT_PROJECT_NAME`], set active.
    fn default() -> Self {
        let project = Project::new(DEFAULT_PROJECT_NAME);
        Self {
            active_project_id: Some(project.id.clone()),
            projects: vec![project],
        }
    }
}
