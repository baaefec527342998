//! Terminal user interface for the widget dashboard.
//!
//! Built on ratatui and crossterm. The grid is driven from the keyboard:
//! edit mode moves, resizes and removes the focused widget.

pub mod app;
pub mod event;
pub mod grid;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
