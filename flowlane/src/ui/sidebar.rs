//! Sidebar rendering for the project list.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the sidebar with the project list.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == PanelFocus::Sidebar;
    let active_id = app.store.active_project_id();

    let items: Vec<ListItem> = app
        .store
        .projects()
        .iter()
        .enumerate()
        .map(|(idx, project)| {
            let is_active = active_id == Some(&project.id);
            let is_selected = idx == app.selected_project;

            let marker = if is_active { "● " } else { "  " };
            let line = Line::from(vec![
                Span::styled(marker, theme::highlighted()),
                Span::raw(project.name.as_str()),
                Span::styled(format!(" ({})", project.task_count()), theme::dimmed()),
            ]);

            let style = if is_selected && is_focused {
                theme::selected()
            } else if is_active {
                theme::bold()
            } else {
                theme::normal()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled("Projects", theme::panel_title(theme::HIGHLIGHT)))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let list = List::new(items).block(block);
    let mut state = ListState::default().with_selected(Some(app.selected_project));

    frame.render_stateful_widget(list, area, &mut state);
}
