//! Application state and main event loop for the TUI.
//!
//! Manages terminal setup/teardown, the panic hook, and the render loop.
//! Every layout change goes through the [`GridController`]; the app only
//! tracks focus, scrolling, the picker and one [`WidgetHost`] per widget.

use std::collections::BTreeMap;
use std::io::{self, stdout};
use std::time::Duration;

use crossterm::{
    event::KeyEventKind,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dashboard_layout::{Breakpoint, LayoutCell};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::prelude::{CrosstermBackend, Terminal};
use tracing::{debug, error};

use crate::config::schema::TuiConfig;
use crate::grid::{is_containing_panic, GridController, HostFrame, Mutation, WidgetHost};
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::grid::InteractiveGrid;
use crate::tui::ui::render_dashboard;
use crate::widgets::WidgetContext;

/// Main application state for the TUI.
#[derive(Debug)]
pub struct App {
    /// Whether the app should exit.
    pub should_quit: bool,
    /// Owner of the active widget set and layout.
    pub grid: GridController,
    /// Fault boundary per active widget.
    hosts: BTreeMap<String, WidgetHost>,
    /// Focused widget id.
    pub focus: Option<String>,
    /// Highlighted picker entry while the picker is open.
    pub picker: Option<usize>,
    /// Lines scrolled off the top of the grid.
    pub scroll: u16,
    /// Ticks since start; drives time-based widget content.
    pub tick_count: u64,
    /// Terminal width in columns.
    pub width: u16,
    tui: TuiConfig,
}

impl App {
    /// Creates the app for an initialized controller.
    pub fn new(grid: GridController, tui: TuiConfig, width: u16) -> Self {
        let mut app = Self {
            should_quit: false,
            grid,
            hosts: BTreeMap::new(),
            focus: None,
            picker: None,
            scroll: 0,
            tick_count: 0,
            width,
            tui,
        };
        app.sync_hosts();
        app
    }

    /// Breakpoint for the current terminal width.
    pub fn breakpoint(&self) -> Option<Breakpoint> {
        let px = u32::from(self.width).saturating_mul(self.tui.column_px);
        self.grid.breakpoints().for_width(px).copied()
    }

    /// Interactive grid for the current breakpoint.
    pub fn interactive_grid(&self) -> Option<InteractiveGrid> {
        self.breakpoint()
            .map(|bp| InteractiveGrid::new(bp, self.tui.row_height, self.tui.auto_compact))
    }

    /// Host for `widget_id`, if the widget is active.
    pub fn host(&self, widget_id: &str) -> Option<&WidgetHost> {
        self.hosts.get(widget_id)
    }

    /// Creates hosts for newly active widgets and drops the rest.
    ///
    /// Focus falls back to the first active widget when its widget is gone.
    pub fn sync_hosts(&mut self) {
        let active = self.grid.active_widgets();
        self.hosts.retain(|id, _| active.contains(id));
        for id in active {
            if self.hosts.contains_key(id) {
                continue;
            }
            match self.grid.registry().get(id) {
                Some(descriptor) => {
                    self.hosts.insert(id.clone(), WidgetHost::new(descriptor));
                }
                None => debug!(widget_id = %id, "No descriptor for active widget"),
            }
        }
        let focus_valid = self
            .focus
            .as_deref()
            .is_some_and(|id| self.grid.is_active(id));
        if !focus_valid {
            self.focus = self.grid.active_widgets().first().cloned();
        }
    }

    /// Moves focus forward through the active widgets, wrapping around.
    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    /// Moves focus backward through the active widgets, wrapping around.
    pub fn focus_prev(&mut self) {
        let len = self.grid.active_widgets().len();
        self.step_focus(len.saturating_sub(1));
    }

    fn step_focus(&mut self, step: usize) {
        let active = self.grid.active_widgets();
        if active.is_empty() {
            self.focus = None;
            return;
        }
        let next = match self
            .focus
            .as_deref()
            .and_then(|id| active.iter().position(|a| a == id))
        {
            Some(pos) => (pos + step) % active.len(),
            None => 0,
        };
        self.focus = Some(active[next].clone());
    }

    /// Applies one action to the app state.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::ToggleEdit => {
                self.grid.toggle_edit_mode();
            }
            Action::FocusNext => self.focus_next(),
            Action::FocusPrev => self.focus_prev(),
            Action::OpenPicker => self.picker = Some(0),
            Action::ClosePicker => self.picker = None,
            Action::PickerUp => {
                if let Some(index) = self.picker.as_mut() {
                    *index = index.saturating_sub(1);
                }
            }
            Action::PickerDown => {
                let last = self.grid.addable_widgets().len().saturating_sub(1);
                if let Some(index) = self.picker.as_mut() {
                    *index = (*index + 1).min(last);
                }
            }
            Action::PickerConfirm => self.confirm_picker(),
            Action::Retry => {
                if let Some(host) = self.focus.as_ref().and_then(|id| self.hosts.get_mut(id)) {
                    host.retry();
                }
            }
            Action::DismissNotice => {
                if let Some(id) = self.grid.notices().first().map(|n| n.id) {
                    self.grid.dismiss_notice(id);
                }
            }
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(self.tui.row_height),
            Action::ScrollDown => self.scroll = self.scroll.saturating_add(self.tui.row_height),
            Action::Move { dx, dy } => {
                self.edit_focused(|grid, cells, id| grid.move_cell(cells, id, dx, dy));
            }
            Action::Resize { dw, dh } => {
                self.edit_focused(|grid, cells, id| grid.resize_cell(cells, id, dw, dh));
            }
            Action::Remove => self.remove_focused(),
            Action::Compact => self.compact_current(),
        }
    }

    fn confirm_picker(&mut self) {
        let Some(index) = self.picker.take() else {
            return;
        };
        let Some(id) = self.grid.addable_widgets().get(index).map(|d| d.id) else {
            return;
        };
        if self.grid.add_widget(id).changed() {
            self.sync_hosts();
            self.focus = Some(id.to_string());
        }
    }

    fn edit_focused(
        &mut self,
        change: impl FnOnce(&InteractiveGrid, &[LayoutCell], &str) -> Option<Vec<LayoutCell>>,
    ) {
        if !self.grid.edit_mode() {
            return;
        }
        let (Some(grid), Some(focus)) = (self.interactive_grid(), self.focus.as_deref()) else {
            return;
        };
        let name = grid.breakpoint().name;
        if let Some(cells) = change(&grid, self.grid.layouts().cells(name), focus) {
            let _ = self.grid.on_interactive_layout_change(name, cells);
        }
    }

    fn remove_focused(&mut self) {
        let Some(host) = self.focus.as_ref().and_then(|id| self.hosts.get(id)) else {
            return;
        };
        if host.request_remove(&mut self.grid) == Mutation::NoOp {
            return;
        }
        self.sync_hosts();
        if self.tui.auto_compact {
            self.compact_current();
        }
    }

    fn compact_current(&mut self) {
        let Some(grid) = self.interactive_grid() else {
            return;
        };
        let name = grid.breakpoint().name;
        if let Some(cells) = grid.compact(self.grid.layouts().cells(name)) {
            let _ = self.grid.on_interactive_layout_change(name, cells);
        }
    }

    /// Draws every visible widget host into `area`.
    ///
    /// Clamps `scroll` so the grid cannot scroll past its last row.
    pub fn render_widgets(&mut self, area: Rect, buf: &mut Buffer, ctx: &WidgetContext) {
        let Some(grid) = self.interactive_grid() else {
            return;
        };
        let name = grid.breakpoint().name;
        let content = grid.content_height(self.grid.layouts().cells(name));
        self.scroll = self.scroll.min(content.saturating_sub(area.height));

        let edit_mode = self.grid.edit_mode();
        for id in self.grid.active_widgets() {
            let Some(cell) = self.grid.layouts().cell(name, id) else {
                continue;
            };
            let Some(rect) = grid.cell_rect(cell, area, self.scroll) else {
                continue;
            };
            let Some(host) = self.hosts.get_mut(id) else {
                continue;
            };
            let frame = HostFrame {
                focused: self.focus.as_deref() == Some(id.as_str()),
                edit_mode,
            };
            host.render(rect, buf, ctx, frame);
        }
    }

    /// Runs the TUI: sets up the terminal, enters the event loop, restores on exit.
    pub async fn run(&mut self, tick_rate: Duration) -> io::Result<()> {
        // Restore the terminal before printing a real panic. Panics contained
        // by a widget host are only logged.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            if is_containing_panic() {
                error!("Widget panicked: {panic_info}");
                return;
            }
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop(tick_rate).await;

        restore_terminal()?;
        result
    }

    async fn event_loop(&mut self, tick_rate: Duration) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let mut events = EventHandler::new(tick_rate);

        while !self.should_quit {
            terminal.draw(|frame| render_dashboard(frame, self))?;

            match events.next().await? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let action = handle_key_event(self, key);
                    self.apply(action);
                }
                Event::Key(_) => {}
                Event::Resize(width, _) => self.width = width,
                Event::Tick => self.tick_count += 1,
            }
        }
        Ok(())
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}
