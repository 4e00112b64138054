//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Mode, PanelFocus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match (&app.mode, app.focus) {
        (Mode::Normal, PanelFocus::Sidebar) => {
            "↑↓/jk: select | Enter: open | n: new | r: rename | d: delete | Tab: board | q: quit"
        }
        (Mode::Normal, PanelFocus::Board) => {
            "←→↑↓: move | a: add | e: edit | d: delete | t/T: tag | Space: move task | C: clear | /: filter | Tab: projects | q: quit"
        }
        (Mode::Grab(_), _) => "←→↑↓: choose spot | Space/Enter: drop | Esc: cancel",
        (Mode::Prompt(_), _) => "Enter: confirm | Esc: cancel",
        (Mode::Editor(_), _) => "Tab/↑↓: field | ←→: column | Enter: save | Esc: cancel",
        (Mode::Confirm(_), _) => "y: confirm | n/Esc: cancel",
    };

    let mut spans = vec![
        Span::styled("FlowLane", theme::bold()),
        Span::raw(" | "),
    ];

    if app.store.is_dirty() {
        spans.push(Span::styled("● unsaved", theme::normal().fg(theme::WARNING)));
        spans.push(Span::raw(" | "));
    }
    if app.filter.is_active() {
        spans.push(Span::styled(
            format!("filter: {}", app.filter.query()),
            theme::highlighted(),
        ));
        spans.push(Span::raw(" | "));
    }

    match &app.notice {
        Some(notice) => spans.push(Span::styled(notice.as_str(), theme::normal().fg(theme::WARNING))),
        None => spans.push(Span::styled(help_text, theme::dimmed())),
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
