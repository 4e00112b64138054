//! Terminal UI rendering.

pub mod board;
pub mod popup;
pub mod sidebar;
pub mod status_bar;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Create main layout with status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let content_area = main_chunks[0];
    let status_area = main_chunks[1];

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20), // Projects
            Constraint::Percentage(80), // Board
        ])
        .split(content_area);

    sidebar::render(frame, content_chunks[0], app);
    board::render(frame, content_chunks[1], app);
    status_bar::render(frame, status_area, app);

    // Dialogs draw over everything else
    popup::render(frame, app);
}
