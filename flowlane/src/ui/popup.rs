//! Dialogs drawn over the board: prompts, the task editor and
//! confirmations.

use flowlane_core::ColumnId;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::theme;
use crate::app::{App, Confirm, EditorField, InputLine, Mode, Prompt, TaskEditor};

/// Render whichever dialog the current mode calls for, if any.
pub fn render(frame: &mut Frame, app: &App) {
    match &app.mode {
        Mode::Prompt(prompt) => render_prompt(frame, prompt),
        Mode::Editor(editor) => render_editor(frame, editor),
        Mode::Confirm(confirm) => render_confirm(frame, app, confirm),
        Mode::Normal | Mode::Grab(_) => {}
    }
}

fn render_prompt(frame: &mut Frame, prompt: &Prompt) {
    let area = centered_rect(50, 5, frame.area());

    let mut lines = vec![Line::from(prompt.input.text())];
    if let Some(error) = &prompt.error {
        lines.push(Line::from(Span::styled(error.as_str(), theme::error())));
    }

    let dialog = Paragraph::new(lines).block(dialog_block(prompt.kind.title(), theme::highlighted()));
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
    place_cursor(frame, &prompt.input, area.x + 1, area.y + 1);
}

fn render_editor(frame: &mut Frame, editor: &TaskEditor) {
    let area = centered_rect(60, 12, frame.area());
    let label = |field: EditorField, text: &'static str| {
        if editor.field == field {
            Span::styled(text, theme::highlighted())
        } else {
            Span::styled(text, theme::dimmed())
        }
    };

    let column_line = if editor.is_new() {
        let mut spans = vec![label(EditorField::Column, "Status:      ")];
        for column in ColumnId::ALL {
            let style = if column == editor.column {
                theme::panel_title(theme::column_color(column))
            } else {
                theme::dimmed()
            };
            spans.push(Span::styled(format!(" {} ", column.title()), style));
        }
        Line::from(spans)
    } else {
        Line::from(vec![
            Span::styled("Status:      ", theme::dimmed()),
            Span::styled(editor.column.title(), theme::panel_title(theme::column_color(editor.column))),
        ])
    };

    let mut lines = vec![
        Line::from(vec![
            label(EditorField::Title, "Title:       "),
            Span::raw(editor.title.text()),
        ]),
        Line::default(),
        Line::from(vec![
            label(EditorField::Description, "Description: "),
            Span::raw(editor.description.text()),
        ]),
        Line::default(),
        column_line,
    ];
    if let Some(error) = &editor.error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(error.as_str(), theme::error())));
    }

    let title = if editor.is_new() { "Add Task" } else { "Edit Task" };
    let dialog = Paragraph::new(lines)
        .block(dialog_block(title, theme::highlighted()))
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);

    let label_width = 13;
    match editor.field {
        EditorField::Title => place_cursor(frame, &editor.title, area.x + 1 + label_width, area.y + 1),
        EditorField::Description => {
            place_cursor(frame, &editor.description, area.x + 1 + label_width, area.y + 3);
        }
        EditorField::Column => {}
    }
}

fn render_confirm(frame: &mut Frame, app: &App, confirm: &Confirm) {
    let area = centered_rect(50, 7, frame.area());

    let (title, question) = match confirm {
        Confirm::DeleteProject(id) => {
            let name = app
                .store
                .state()
                .project(id)
                .map_or("this project", |p| p.name.as_str());
            (
                "Delete Project",
                format!("Delete \"{name}\" and all of its tasks?"),
            )
        }
        Confirm::DeleteTask(task) => {
            let name = app
                .store
                .active_project()
                .and_then(|p| p.task(&task.id))
                .map_or("this task", |t| t.title.as_str());
            ("Delete Task", format!("Delete \"{name}\"?"))
        }
        Confirm::ClearColumn(column) => (
            "Clear Column",
            format!("Remove every task from {}?", column.title()),
        ),
    };

    let body = vec![
        Line::from(Span::styled(question, theme::error())),
        Line::default(),
        Line::from("Press y to confirm, n or Esc to cancel"),
    ];
    let dialog = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(dialog_block(title, theme::error()));
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

fn dialog_block(title: &str, style: Style) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, style))
        .borders(Borders::ALL)
        .border_style(style)
}

fn place_cursor(frame: &mut Frame, input: &InputLine, x: u16, y: u16) {
    let offset = u16::try_from(input.cursor()).unwrap_or(u16::MAX);
    frame.set_cursor_position(Position::new(x.saturating_add(offset), y));
}

/// A rectangle `percent_x` wide and `height` rows tall, centered in `r`.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
