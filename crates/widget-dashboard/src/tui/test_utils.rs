//! Buffer inspection and app fixtures for rendering tests.

#![cfg(test)]

use dashboard_layout::{LayoutStore, MemoryStore};
use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};

use crate::config::schema::TuiConfig;
use crate::grid::GridController;
use crate::tui::app::App;
use crate::widgets::WidgetRegistry;

/// Symbols of one buffer row joined together; empty outside the buffer.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if !(area.top()..area.bottom()).contains(&row) {
        return String::new();
    }
    (area.left()..area.right())
        .filter_map(|col| buffer.cell((col, row)))
        .map(|cell| cell.symbol())
        .collect()
}

/// First row containing `text`.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    let area = buffer.area();
    (area.top()..area.bottom()).find(|&row| row_text(buffer, row).contains(text))
}

/// Panics unless the first cell of `text` on `row` is drawn in `color`.
pub fn assert_text_fg_in_row(buffer: &Buffer, row: u16, text: &str, color: Color) {
    let line = row_text(buffer, row);
    let Some(start) = line.find(text) else {
        panic!("{text:?} not on row {row}: {line:?}");
    };
    let col = buffer.area().left() + line[..start].chars().count() as u16;
    let fg = buffer.cell((col, row)).map(|cell| cell.fg);
    assert_eq!(fg, Some(color), "{text:?} at ({col}, {row})");
}

/// Dashboard over a fresh in-memory store, default widgets placed.
pub fn make_app(width: u16) -> App {
    let mut grid = GridController::new(
        WidgetRegistry::builtin(),
        LayoutStore::new(MemoryStore::new()),
    );
    grid.initialize();
    App::new(grid, TuiConfig::default(), width)
}

/// One full frame of `render_dashboard` on a `width` x `height` screen.
pub fn render_dashboard_to_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal =
        Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    terminal
        .draw(|frame| crate::tui::ui::render_dashboard(frame, app))
        .expect("draw");
    terminal.backend().buffer().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    #[test]
    fn rows_are_read_in_buffer_coordinates() {
        let mut buffer = Buffer::empty(Rect::new(5, 7, 6, 2));
        buffer.set_string(5, 8, "tasks", Style::default().fg(Color::Green));
        assert_eq!(row_text(&buffer, 7), "      ");
        assert_eq!(row_text(&buffer, 8), "tasks ");
        assert_eq!(row_text(&buffer, 0), "");
        assert_eq!(find_row_with_text(&buffer, "ask"), Some(8));
        assert_eq!(find_row_with_text(&buffer, "claims"), None);
        assert_text_fg_in_row(&buffer, 8, "tasks", Color::Green);
    }

    #[test]
    fn fixture_app_renders_at_requested_size() {
        let mut app = make_app(100);
        let buffer = render_dashboard_to_buffer(&mut app, 100, 30);
        assert_eq!(*buffer.area(), Rect::new(0, 0, 100, 30));
        assert_eq!(app.width, 100);
    }
}
