//! Application state and event handling.

use std::borrow::Cow;
use std::fmt::Write as _;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use flowlane_core::resolver::{DragItem, DragPhase, DropTarget};
use flowlane_core::storage::KeyValueStorage;
use flowlane_core::store::{ProjectStore, StoreError, TaskPatch};
use flowlane_core::{ColumnId, Project, ProjectId, Task, TaskId, TitleFilter};
use tracing::debug;

use crate::config::ClientConfig;

/// The store as owned by the running application.
pub type Store = ProjectStore<Box<dyn KeyValueStorage>>;

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Project list.
    Sidebar,
    /// Columns of the active project (default).
    Board,
}

/// Single-line text input with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    text: String,
    /// Cursor position (character index).
    cursor: usize,
}

impl InputLine {
    /// Input pre-filled with `text`, cursor at the end.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// Current contents.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Applies an editing key. Returns `false` for keys it does not handle.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.enter_char(c);
            }
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.cursor < self.text.chars().count() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.chars().count(),
            _ => return false,
        }
        true
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(idx, _)| idx)
    }

    /// Insert a character at the cursor position.
    fn enter_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index();
            self.text.remove(idx);
        }
    }
}

/// A task as addressed by store actions: its id plus the column holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    /// Task id.
    pub id: TaskId,
    /// Column the task is in.
    pub column_id: ColumnId,
}

impl TaskRef {
    fn drag_item(&self) -> DragItem {
        DragItem::Task {
            id: self.id.clone(),
            column_id: self.column_id,
        }
    }
}

/// What a single-line prompt is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Name for a new project.
    NewProject,
    /// New name for an existing project.
    RenameProject(ProjectId),
    /// Tag to add to a task.
    AddTag(TaskRef),
    /// Tag to remove from a task.
    RemoveTag(TaskRef),
    /// Title filter, applied while typing.
    Filter,
}

impl PromptKind {
    /// Popup title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::NewProject => "New Project",
            Self::RenameProject(_) => "Rename Project",
            Self::AddTag(_) => "Add Tag",
            Self::RemoveTag(_) => "Remove Tag",
            Self::Filter => "Filter Tasks",
        }
    }
}

/// An open single-line prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// What is being asked.
    pub kind: PromptKind,
    /// Text entered so far.
    pub input: InputLine,
    /// Validation message from the last submit, if any.
    pub error: Option<String>,
}

impl Prompt {
    fn new(kind: PromptKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            input: InputLine::new(text),
            error: None,
        }
    }
}

/// Field of the task editor that receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Target column (new tasks only).
    Column,
}

/// The task editor popup, for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEditor {
    /// Task being edited, or `None` when creating.
    pub editing: Option<TaskRef>,
    /// Title input.
    pub title: InputLine,
    /// Description input.
    pub description: InputLine,
    /// Column a new task is created in.
    pub column: ColumnId,
    /// Focused field.
    pub field: EditorField,
    /// Validation message from the last submit, if any.
    pub error: Option<String>,
}

impl TaskEditor {
    fn create(column: ColumnId) -> Self {
        Self {
            editing: None,
            title: InputLine::default(),
            description: InputLine::default(),
            column,
            field: EditorField::Title,
            error: None,
        }
    }

    fn edit(task: &Task) -> Self {
        Self {
            editing: Some(TaskRef {
                id: task.id.clone(),
                column_id: task.column_id,
            }),
            title: InputLine::new(task.title.as_str()),
            description: InputLine::new(task.description.clone().unwrap_or_default()),
            column: task.column_id,
            field: EditorField::Title,
            error: None,
        }
    }

    /// Whether the editor creates a new task.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.editing.is_none()
    }

    const fn next_field(&mut self) {
        self.field = match (self.field, self.is_new()) {
            (EditorField::Title, _) => EditorField::Description,
            (EditorField::Description, true) => EditorField::Column,
            (EditorField::Description, false) | (EditorField::Column, _) => EditorField::Title,
        };
    }

    const fn prev_field(&mut self) {
        self.field = match (self.field, self.is_new()) {
            (EditorField::Title, true) => EditorField::Column,
            (EditorField::Title, false) | (EditorField::Column, _) => EditorField::Description,
            (EditorField::Description, _) => EditorField::Title,
        };
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        match self.field {
            EditorField::Title => {
                self.title.handle_key(key);
            }
            EditorField::Description => {
                self.description.handle_key(key);
            }
            EditorField::Column => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.column = self.column.prev().unwrap_or(self.column);
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.column = self.column.next().unwrap_or(self.column);
                }
                _ => {}
            },
        }
    }
}

/// A destructive action waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    /// Delete a project and all its tasks.
    DeleteProject(ProjectId),
    /// Delete one task.
    DeleteTask(TaskRef),
    /// Remove every task from a column.
    ClearColumn(ColumnId),
}

/// What keys currently drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Navigation and shortcuts.
    Normal,
    /// A task is picked up and follows the cursor until dropped.
    Grab(TaskRef),
    /// A single-line prompt is open.
    Prompt(Prompt),
    /// The task editor is open.
    Editor(TaskEditor),
    /// A confirmation dialog is open.
    Confirm(Confirm),
}

/// Main application state.
pub struct App {
    /// The board and its persistence.
    pub store: Store,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// What keys currently drive.
    pub mode: Mode,
    /// Title filter applied to the rendered board.
    pub filter: TitleFilter,
    /// Selected index in the project list.
    pub selected_project: usize,
    /// Column under the board cursor.
    pub selected_column: ColumnId,
    /// Row under the board cursor, in the filtered view.
    pub selected_task: usize,
    /// Whether cards show descriptions.
    pub show_descriptions: bool,
    /// Header date format (chrono).
    pub date_format: String,
    /// One-shot message for the status bar, cleared on the next key.
    pub notice: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create the application around an opened store.
    #[must_use]
    pub fn new(store: Store) -> Self {
        let defaults = ClientConfig::default();
        let mut app = Self {
            store,
            focus: PanelFocus::Board,
            mode: Mode::Normal,
            filter: TitleFilter::default(),
            selected_project: 0,
            selected_column: ColumnId::Todo,
            selected_task: 0,
            show_descriptions: defaults.show_descriptions,
            date_format: defaults.date_format,
            notice: None,
            should_quit: false,
        };
        app.sync_selected_project();
        app
    }

    /// Apply display settings from the resolved configuration.
    #[must_use]
    pub fn with_config(mut self, config: &ClientConfig) -> Self {
        self.show_descriptions = config.show_descriptions;
        self.date_format.clone_from(&config.date_format);
        self
    }

    /// The active project as rendered: filtered by [`App::filter`].
    #[must_use]
    pub fn view(&self) -> Option<Cow<'_, Project>> {
        self.store
            .active_project()
            .map(|project| self.filter.apply(project))
    }

    /// Today's date for the board header.
    #[must_use]
    pub fn header_date(&self) -> String {
        let now = chrono::Local::now();
        let mut out = String::new();
        if write!(out, "{}", now.format(&self.date_format)).is_err() {
            return now.format("%Y-%m-%d").to_string();
        }
        out
    }

    /// The task under the board cursor, if any.
    #[must_use]
    pub fn selected_task_ref(&self) -> Option<TaskRef> {
        let view = self.view()?;
        let task = view
            .column(self.selected_column)
            .tasks
            .get(self.selected_task)?;
        Some(TaskRef {
            id: task.id.clone(),
            column_id: self.selected_column,
        })
    }

    /// The task currently picked up, if any.
    #[must_use]
    pub const fn grabbed(&self) -> Option<&TaskRef> {
        match &self.mode {
            Mode::Grab(task) => Some(task),
            _ => None,
        }
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        self.notice = None;

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Grab(task) => self.handle_grab_key(task, key),
            Mode::Prompt(prompt) => self.handle_prompt_key(prompt, key),
            Mode::Editor(editor) => self.handle_editor_key(editor, key),
            Mode::Confirm(confirm) => self.handle_confirm_key(&confirm, key),
        }
        self.clamp_selection();
    }

    // --- normal mode ---

    fn handle_normal_key(&mut self, key: KeyEvent) {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_focus();
                return;
            }
            KeyCode::Char('n') => {
                self.mode = Mode::Prompt(Prompt::new(PromptKind::NewProject, ""));
                return;
            }
            KeyCode::Char('/') => {
                let query = self.filter.query().to_string();
                self.mode = Mode::Prompt(Prompt::new(PromptKind::Filter, query));
                return;
            }
            _ => {}
        }

        // Focus-specific shortcuts
        match self.focus {
            PanelFocus::Sidebar => self.handle_sidebar_key(key),
            PanelFocus::Board => self.handle_board_key(key),
        }
    }

    /// Handle key event when the project list is focused.
    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        let selected = self
            .store
            .projects()
            .get(self.selected_project)
            .map(|p| (p.id.clone(), p.name.clone()));

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_project = self.selected_project.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_project + 1 < self.store.projects().len() {
                    self.selected_project += 1;
                }
            }
            KeyCode::Enter => {
                if let Some((id, _)) = selected {
                    match self.store.set_active_project(&id) {
                        Ok(()) => {
                            self.reset_board_cursor();
                            self.focus = PanelFocus::Board;
                        }
                        Err(err) => log_ignored(&err),
                    }
                }
            }
            KeyCode::Char('r') => {
                if let Some((id, name)) = selected {
                    self.mode = Mode::Prompt(Prompt::new(PromptKind::RenameProject(id), name));
                }
            }
            KeyCode::Char('d') => {
                if let Some((id, _)) = selected {
                    self.mode = Mode::Confirm(Confirm::DeleteProject(id));
                }
            }
            _ => {}
        }
    }

    /// Handle key event when the board is focused.
    fn handle_board_key(&mut self, key: KeyEvent) {
        if self.store.active_project().is_none() {
            self.notice = Some("No project selected. Press n to create one.".to_string());
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.prev().unwrap_or(self.selected_column);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column = self.selected_column.next().unwrap_or(self.selected_column);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_task + 1 < self.column_len(self.selected_column) {
                    self.selected_task += 1;
                }
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Editor(TaskEditor::create(self.selected_column));
            }
            KeyCode::Char('C') => {
                self.mode = Mode::Confirm(Confirm::ClearColumn(self.selected_column));
            }
            _ => self.handle_task_key(key),
        }
    }

    /// Shortcuts acting on the task under the cursor.
    fn handle_task_key(&mut self, key: KeyEvent) {
        let Some(task) = self.selected_task_ref() else {
            return;
        };

        match key.code {
            KeyCode::Enter | KeyCode::Char('e') => {
                let editor = self
                    .store
                    .active_project()
                    .and_then(|p| p.task(&task.id))
                    .map(TaskEditor::edit);
                if let Some(editor) = editor {
                    self.mode = Mode::Editor(editor);
                }
            }
            KeyCode::Char('d') => self.mode = Mode::Confirm(Confirm::DeleteTask(task)),
            KeyCode::Char('t') => self.mode = Mode::Prompt(Prompt::new(PromptKind::AddTag(task), "")),
            KeyCode::Char('T') => {
                self.mode = Mode::Prompt(Prompt::new(PromptKind::RemoveTag(task), ""));
            }
            KeyCode::Char(' ') => {
                self.notice =
                    Some("Moving task: arrows pick a spot, Space drops, Esc cancels".to_string());
                self.mode = Mode::Grab(task);
            }
            _ => {}
        }
    }

    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Sidebar => PanelFocus::Board,
            PanelFocus::Board => PanelFocus::Sidebar,
        };
    }

    // --- keyboard drag ---

    /// While grabbing, the cursor walks over drop targets. Every row of a
    /// column is a task target and the slot after the last row is the
    /// column itself.
    fn handle_grab_key(&mut self, task: TaskRef, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                // Released outside any target.
                self.store.drag(DragPhase::End, &task.drag_item(), None);
                self.follow(&task.id);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let target = self.target_under_cursor();
                self.store
                    .drag(DragPhase::End, &task.drag_item(), target.as_ref());
                self.follow(&task.id);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.prev().unwrap_or(self.selected_column);
                self.hover(task);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column = self.selected_column.next().unwrap_or(self.selected_column);
                self.hover(task);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
                self.hover(task);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_task < self.column_len(self.selected_column) {
                    self.selected_task += 1;
                }
                self.hover(task);
            }
            _ => self.mode = Mode::Grab(task),
        }
    }

    /// Emit a hover event for the target under the cursor and keep grabbing.
    fn hover(&mut self, task: TaskRef) {
        let len = self.column_len(self.selected_column);
        self.selected_task = self.selected_task.min(len);
        let target = self.target_under_cursor();
        let task = match self
            .store
            .drag(DragPhase::Over, &task.drag_item(), target.as_ref())
        {
            Some(request) => {
                self.follow(&request.task_id);
                TaskRef {
                    id: request.task_id,
                    column_id: request.dest,
                }
            }
            None => task,
        };
        self.mode = Mode::Grab(task);
    }

    fn target_under_cursor(&self) -> Option<DropTarget> {
        let view = self.view()?;
        let target = view
            .column(self.selected_column)
            .tasks
            .get(self.selected_task)
            .map_or(DropTarget::Column(self.selected_column), |t| {
                DropTarget::Task {
                    id: t.id.clone(),
                    column_id: self.selected_column,
                }
            });
        Some(target)
    }

    /// Put the board cursor on a task, if it is visible.
    fn follow(&mut self, task_id: &TaskId) {
        if let Some((column, idx)) = self.view().and_then(|view| view.locate_task(task_id)) {
            self.selected_column = column;
            self.selected_task = idx;
        }
    }

    // --- prompts ---

    fn handle_prompt_key(&mut self, mut prompt: Prompt, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if prompt.kind == PromptKind::Filter {
                    self.filter = TitleFilter::default();
                }
            }
            KeyCode::Enter => {
                if let Err(message) = self.submit_prompt(&prompt) {
                    prompt.error = Some(message);
                    self.mode = Mode::Prompt(prompt);
                }
            }
            _ => {
                if prompt.input.handle_key(key) {
                    prompt.error = None;
                    if prompt.kind == PromptKind::Filter {
                        self.filter = TitleFilter::new(prompt.input.text());
                    }
                }
                self.mode = Mode::Prompt(prompt);
            }
        }
    }

    /// Apply a submitted prompt. `Err` keeps the prompt open with a message.
    fn submit_prompt(&mut self, prompt: &Prompt) -> Result<(), String> {
        let text = prompt.input.text().trim();
        match &prompt.kind {
            PromptKind::NewProject => {
                if text.is_empty() {
                    return Err("Project name is required".to_string());
                }
                self.store.add_project(text);
                self.sync_selected_project();
                self.reset_board_cursor();
                self.focus = PanelFocus::Board;
            }
            PromptKind::RenameProject(id) => {
                if text.is_empty() {
                    return Err("Project name is required".to_string());
                }
                if let Err(err) = self.store.rename_project(id, text) {
                    log_ignored(&err);
                }
            }
            PromptKind::AddTag(task) => {
                match self.store.add_tag_to_task(&task.id, task.column_id, text) {
                    Ok(false) if !text.is_empty() => {
                        self.notice = Some(format!("Task is already tagged \"{text}\""));
                    }
                    Ok(_) => {}
                    Err(err) => log_ignored(&err),
                }
            }
            PromptKind::RemoveTag(task) => {
                match self
                    .store
                    .remove_tag_from_task(&task.id, task.column_id, text)
                {
                    Ok(0) => self.notice = Some(format!("Task has no tag \"{text}\"")),
                    Ok(_) => {}
                    Err(err) => log_ignored(&err),
                }
            }
            PromptKind::Filter => {}
        }
        Ok(())
    }

    // --- task editor ---

    fn handle_editor_key(&mut self, mut editor: TaskEditor, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => match self.submit_editor(&editor) {
                Ok(()) => {}
                Err(err) if err.is_missing_target() => log_ignored(&err),
                Err(err) => {
                    editor.error = Some(err.to_string());
                    self.mode = Mode::Editor(editor);
                }
            },
            KeyCode::Tab | KeyCode::Down => {
                editor.next_field();
                self.mode = Mode::Editor(editor);
            }
            KeyCode::BackTab | KeyCode::Up => {
                editor.prev_field();
                self.mode = Mode::Editor(editor);
            }
            _ => {
                editor.handle_field_key(key);
                self.mode = Mode::Editor(editor);
            }
        }
    }

    fn submit_editor(&mut self, editor: &TaskEditor) -> Result<(), StoreError> {
        let title = editor.title.text().trim();
        let description = editor.description.text().trim();
        let description = (!description.is_empty()).then_some(description);

        match &editor.editing {
            None => {
                let id = self.store.add_task(editor.column, title, description)?;
                self.follow(&id);
            }
            Some(task) => {
                let patch = TaskPatch::default()
                    .title(title)
                    .description(description.map(str::to_string));
                self.store.update_task(&task.id, task.column_id, patch)?;
            }
        }
        Ok(())
    }

    // --- confirmations ---

    fn handle_confirm_key(&mut self, confirm: &Confirm, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.apply_confirm(confirm),
            KeyCode::Char('n') | KeyCode::Esc => {}
            _ => self.mode = Mode::Confirm(confirm.clone()),
        }
    }

    fn apply_confirm(&mut self, confirm: &Confirm) {
        let result = match confirm {
            Confirm::DeleteProject(id) => self.store.delete_project(id),
            Confirm::DeleteTask(task) => self
                .store
                .delete_task(&task.id, task.column_id)
                .map(|_| ()),
            Confirm::ClearColumn(column) => self.store.clear_column(*column).map(|_| ()),
        };
        match result {
            Ok(()) => {
                if matches!(confirm, Confirm::DeleteProject(_)) {
                    self.sync_selected_project();
                    self.reset_board_cursor();
                }
            }
            Err(err) => log_ignored(&err),
        }
    }

    // --- selection bookkeeping ---

    fn column_len(&self, column: ColumnId) -> usize {
        self.view().map_or(0, |view| view.column(column).len())
    }

    /// Keep the cursor on an existing row. While grabbing, the slot after
    /// the last row is also valid.
    fn clamp_selection(&mut self) {
        let len = self.column_len(self.selected_column);
        let last_row = if matches!(self.mode, Mode::Grab(_)) {
            len
        } else {
            len.saturating_sub(1)
        };
        self.selected_task = self.selected_task.min(last_row);
        let last_project = self.store.projects().len().saturating_sub(1);
        self.selected_project = self.selected_project.min(last_project);
    }

    const fn reset_board_cursor(&mut self) {
        self.selected_column = ColumnId::Todo;
        self.selected_task = 0;
    }

    fn sync_selected_project(&mut self) {
        self.selected_project = self
            .store
            .active_project_id()
            .and_then(|id| self.store.projects().iter().position(|p| &p.id == id))
            .unwrap_or(0);
    }
}

/// Actions on targets that disappeared are expected races, not errors.
fn log_ignored(err: &StoreError) {
    debug!(error = %err, "ignoring action on missing target");
}
