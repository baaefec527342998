//! Event handling for the TUI.
//!
//! Wraps crossterm events and adds a tick variant for periodic redraws, then
//! maps key presses to [`Action`]s depending on the current mode.

use std::io;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::tui::app::App;

/// Application-level event variants.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for redraws.
    Tick,
}

/// Merges terminal input with periodic ticks.
pub struct EventHandler {
    reader: EventStream,
    tick: Interval,
}

impl EventHandler {
    /// Creates a handler ticking every `tick_rate`. Must be called inside a
    /// tokio runtime.
    pub fn new(tick_rate: Duration) -> Self {
        let mut tick = interval(tick_rate);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            reader: EventStream::new(),
            tick,
        }
    }

    /// Waits for the next key, resize or tick.
    pub async fn next(&mut self) -> io::Result<Event> {
        loop {
            tokio::select! {
                maybe_event = self.reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) => return Ok(Event::Key(key)),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        // Mouse, focus and paste events are not used
                        Some(Ok(_)) => continue,
                        None => return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                _ = self.tick.tick() => return Ok(Event::Tick),
            }
        }
    }
}

/// Action produced by handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No action to take.
    None,
    /// Quit the application.
    Quit,
    /// Turn edit mode on or off.
    ToggleEdit,
    /// Focus the next widget.
    FocusNext,
    /// Focus the previous widget.
    FocusPrev,
    /// Open the add-widget picker.
    OpenPicker,
    /// Close the picker without adding.
    ClosePicker,
    /// Highlight the previous picker entry.
    PickerUp,
    /// Highlight the next picker entry.
    PickerDown,
    /// Add the highlighted widget.
    PickerConfirm,
    /// Retry the focused widget after a failure.
    Retry,
    /// Dismiss the oldest notice.
    DismissNotice,
    /// Scroll the dashboard up.
    ScrollUp,
    /// Scroll the dashboard down.
    ScrollDown,
    /// Move the focused widget by grid units.
    Move {
        /// Columns
        dx: i16,
        /// Rows
        dy: i16,
    },
    /// Resize the focused widget by grid units.
    Resize {
        /// Columns
        dw: i16,
        /// Rows
        dh: i16,
    },
    /// Remove the focused widget.
    Remove,
    /// Close vertical gaps in the current layout.
    Compact,
}

/// Maps a key press to an action.
///
/// The picker captures navigation keys while open. Move, resize, remove and
/// compact keys only exist in edit mode; outside it the arrows scroll.
pub fn handle_key_event(app: &App, key: KeyEvent) -> Action {
    // Global: quit always works
    match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit
        }
        _ => {}
    }

    if app.picker.is_some() {
        return handle_picker_key(key);
    }

    match key.code {
        KeyCode::Char('e') => return Action::ToggleEdit,
        KeyCode::Tab => return Action::FocusNext,
        KeyCode::BackTab => return Action::FocusPrev,
        KeyCode::Char('a') => return Action::OpenPicker,
        KeyCode::Char('r') => return Action::Retry,
        KeyCode::Char('x') => return Action::DismissNotice,
        KeyCode::PageUp => return Action::ScrollUp,
        KeyCode::PageDown => return Action::ScrollDown,
        _ => {}
    }

    if app.grid.edit_mode() {
        handle_edit_key(key)
    } else {
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            _ => Action::None,
        }
    }
}

fn handle_picker_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('k') | KeyCode::Up => Action::PickerUp,
        KeyCode::Char('j') | KeyCode::Down => Action::PickerDown,
        KeyCode::Enter => Action::PickerConfirm,
        KeyCode::Esc | KeyCode::Char('a') => Action::ClosePicker,
        _ => Action::None,
    }
}

fn handle_edit_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::Move { dx: -1, dy: 0 },
        KeyCode::Char('l') | KeyCode::Right => Action::Move { dx: 1, dy: 0 },
        KeyCode::Char('k') | KeyCode::Up => Action::Move { dx: 0, dy: -1 },
        KeyCode::Char('j') | KeyCode::Down => Action::Move { dx: 0, dy: 1 },
        KeyCode::Char('H') => Action::Resize { dw: -1, dh: 0 },
        KeyCode::Char('L') => Action::Resize { dw: 1, dh: 0 },
        KeyCode::Char('K') => Action::Resize { dw: 0, dh: -1 },
        KeyCode::Char('J') => Action::Resize { dw: 0, dh: 1 },
        KeyCode::Char('d') | KeyCode::Delete => Action::Remove,
        KeyCode::Char('c') => Action::Compact,
        KeyCode::Esc => Action::ToggleEdit,
        _ => Action::None,
    }
}
