//! Theme and styling constants for the TUI.

use flowlane_core::ColumnId;
use ratatui::style::{Color, Modifier, Style};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Warning color (unsaved changes, notices).
pub const WARNING: Color = Color::Yellow;

/// Error color (validation messages, destructive confirmations).
pub const ERROR: Color = Color::LightRed;

/// Accent for the To Do column.
pub const TODO: Color = Color::Blue;

/// Accent for the In Progress column.
pub const IN_PROGRESS: Color = Color::Rgb(255, 165, 0);

/// Accent for the Done column.
pub const DONE: Color = Color::Green;

/// Accent color of a column.
#[must_use]
pub const fn column_color(column: ColumnId) -> Color {
    match column {
        ColumnId::Todo => TODO,
        ColumnId::InProgress => IN_PROGRESS,
        ColumnId::Done => DONE,
    }
}

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (descriptions, placeholders).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused panel borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for a task card that is being moved.
#[must_use]
pub fn grabbed() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(WARNING)
        .add_modifier(Modifier::BOLD)
}

/// Style for a tag badge on a card in `column`.
#[must_use]
pub fn tag(column: ColumnId) -> Style {
    Style::default()
        .fg(column_color(column))
        .add_modifier(Modifier::BOLD)
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for validation and error messages.
#[must_use]
pub fn error() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}
