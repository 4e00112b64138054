//! Board rendering: project header and the three task columns.

use flowlane_core::{Column, ColumnId, Task};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the active project's header and columns, or a placeholder when
/// no project is active.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == PanelFocus::Board;

    let Some(view) = app.view() else {
        let placeholder = Paragraph::new(vec![
            Line::from(Span::styled("No Project Selected", theme::bold())),
            Line::from(Span::styled(
                "Press n to create a project",
                theme::dimmed(),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(theme::normal()));
        frame.render_widget(placeholder, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let header = vec![
        Line::from(Span::styled(view.name.as_str(), theme::bold())),
        Line::from(Span::styled(app.header_date(), theme::dimmed())),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let column_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    for (column, column_area) in view.columns.iter().zip(column_areas.iter()) {
        render_column(frame, *column_area, app, column, is_focused);
    }
}

fn render_column(frame: &mut Frame, area: Rect, app: &App, column: &Column, board_focused: bool) {
    let is_current = board_focused && app.selected_column == column.id;
    let grabbed = app.grabbed().map(|task| &task.id);

    let mut items: Vec<ListItem> = column
        .tasks
        .iter()
        .map(|task| {
            let style = if grabbed == Some(&task.id) {
                theme::grabbed()
            } else {
                theme::normal()
            };
            ListItem::new(card_lines(task, column.id, app.show_descriptions)).style(style)
        })
        .collect();

    if grabbed.is_some() && is_current {
        items.push(ListItem::new(Line::from(Span::styled(
            "── drop at end ──",
            theme::dimmed(),
        ))));
    } else if column.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "Drop tasks here",
            theme::dimmed(),
        ))));
    }

    let title = Line::from(vec![
        Span::styled(column.title.as_str(), theme::panel_title(theme::column_color(column.id))),
        Span::styled(format!(" {}", column.len()), theme::dimmed()),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if is_current {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let highlight = if grabbed.is_some() {
        theme::highlighted()
    } else {
        theme::selected()
    };
    let list = List::new(items).block(block).highlight_style(highlight);

    let selected = (is_current && (grabbed.is_some() || !column.is_empty()))
        .then_some(app.selected_task);
    let mut state = ListState::default().with_selected(selected);

    frame.render_stateful_widget(list, area, &mut state);
}

/// Tags, title and (optionally) description of one card, then a spacer.
fn card_lines(task: &Task, column: ColumnId, show_description: bool) -> Vec<Line<'_>> {
    let mut lines = Vec::with_capacity(4);

    if !task.tags.is_empty() {
        let mut spans = Vec::with_capacity(task.tags.len() * 2);
        for tag in &task.tags {
            spans.push(Span::styled(format!("[{tag}]"), theme::tag(column)));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled(task.title.as_str(), theme::bold())));

    if show_description && let Some(description) = &task.description {
        lines.push(Line::from(Span::styled(description.as_str(), theme::dimmed())));
    }

    lines.push(Line::default());
    lines
}
