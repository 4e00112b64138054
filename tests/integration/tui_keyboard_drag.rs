//! Integration tests for the terminal front end: key sequences drive the
//! store the way a user at the keyboard would, and the board renders.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use flowlane::app::{App, Mode, PanelFocus};
use flowlane::ui;
use flowlane_core::{ColumnId, KeyValueStorage, MemoryStorage, ProjectStore};
use ratatui::{Terminal, backend::TestBackend};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn make_app(storage: &MemoryStorage) -> App {
    let boxed: Box<dyn KeyValueStorage> = Box::new(storage.clone());
    App::new(ProjectStore::open(boxed))
}

fn press(app: &mut App, codes: &[KeyCode]) {
    for code in codes {
        app.handle_key_event(KeyEvent::new(*code, KeyModifiers::NONE));
    }
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, &[KeyCode::Char(c)]);
    }
}

fn add_task(app: &mut App, title: &str) {
    press(app, &[KeyCode::Char('a')]);
    type_text(app, title);
    press(app, &[KeyCode::Enter]);
}

fn titles(app: &App, column: ColumnId) -> Vec<String> {
    app.store
        .active_project()
        .unwrap()
        .column(column)
        .tasks
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

// ===========================================================================
// Keyboard drag
// ===========================================================================

#[test]
fn carry_task_across_two_columns_and_drop() {
    let storage = MemoryStorage::new();
    let mut app = make_app(&storage);
    add_task(&mut app, "Write tests");

    press(&mut app, &[KeyCode::Char(' '), KeyCode::Right, KeyCode::Right]);
    assert_eq!(titles(&app, ColumnId::Done), ["Write tests"]);
    assert!(matches!(app.mode, Mode::Grab(_)));

    press(&mut app, &[KeyCode::Char(' ')]);
    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(app.selected_column, ColumnId::Done);

    let reopened = make_app(&storage);
    assert_eq!(titles(&reopened, ColumnId::Done), ["Write tests"]);
}

#[test]
fn carry_into_middle_of_other_column() {
    let storage = MemoryStorage::new();
    let mut app = make_app(&storage);
    add_task(&mut app, "Moving");
    press(&mut app, &[KeyCode::Right]);
    add_task(&mut app, "Second");
    add_task(&mut app, "First");
    press(&mut app, &[KeyCode::Left]);

    // Entering In Progress on row 0 previews the move above "First".
    press(&mut app, &[KeyCode::Char(' '), KeyCode::Right]);
    assert_eq!(
        titles(&app, ColumnId::InProgress),
        ["Moving", "First", "Second"]
    );
    assert_eq!(app.selected_column, ColumnId::InProgress);
    assert_eq!(app.selected_task, 0);

    // Walk down onto "Second" and drop there.
    press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Char(' ')]);
    assert_eq!(
        titles(&app, ColumnId::InProgress),
        ["First", "Second", "Moving"]
    );
    assert!(titles(&app, ColumnId::Todo).is_empty());
}

#[test]
fn drag_respects_filtered_rows() {
    let storage = MemoryStorage::new();
    let mut app = make_app(&storage);
    add_task(&mut app, "bug: crash");
    add_task(&mut app, "docs");
    add_task(&mut app, "bug: leak");
    // Todo = [bug: leak, docs, bug: crash]; show only bugs.
    press(&mut app, &[KeyCode::Char('/')]);
    type_text(&mut app, "bug");
    press(&mut app, &[KeyCode::Enter]);

    // Carry "bug: leak" onto the visible row 1 ("bug: crash").
    press(&mut app, &[KeyCode::Char(' '), KeyCode::Down, KeyCode::Enter]);
    assert_eq!(
        titles(&app, ColumnId::Todo),
        ["docs", "bug: crash", "bug: leak"]
    );
}

// ===========================================================================
// Rendering
// ===========================================================================

#[test]
fn board_renders_columns_cards_and_tags() {
    let storage = MemoryStorage::new();
    let mut app = make_app(&storage);
    add_task(&mut app, "Design header");
    press(&mut app, &[KeyCode::Char('t')]);
    type_text(&mut app, "design");
    press(&mut app, &[KeyCode::Enter]);

    let screen = render(&app);
    assert!(screen.contains("My First Project"));
    assert!(screen.contains("To Do"));
    assert!(screen.contains("In Progress"));
    assert!(screen.contains("Done"));
    assert!(screen.contains("Design header"));
    assert!(screen.contains("[design]"));
    assert!(screen.contains("Drop tasks here"));
}

#[test]
fn placeholder_when_no_project() {
    let storage = MemoryStorage::new();
    let mut app = make_app(&storage);
    press(
        &mut app,
        &[KeyCode::Tab, KeyCode::Char('d'), KeyCode::Char('y')],
    );
    assert_eq!(app.focus, PanelFocus::Sidebar);
    assert!(render(&app).contains("No Project Selected"));
}

#[test]
fn dialogs_render_over_board() {
    let storage = MemoryStorage::new();
    let mut app = make_app(&storage);
    press(&mut app, &[KeyCode::Char('a'), KeyCode::Enter]);
    let screen = render(&app);
    assert!(screen.contains("Add Task"));
    assert!(screen.contains("Title is required"));

    press(&mut app, &[KeyCode::Esc, KeyCode::Char('C')]);
    assert!(render(&app).contains("Clear Column"));
}
