//! `FlowLane`: terminal kanban board.

pub mod app;
pub mod config;
pub mod ui;
