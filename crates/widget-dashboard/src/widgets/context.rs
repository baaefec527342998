//! Widget context providing shared state for widget rendering.
//!
//! Widgets are self-contained and own their data; the context only carries
//! what every panel may want to agree on, such as the wall-clock time of
//! the current frame.

use chrono::{DateTime, Local};

/// Shared context passed to widgets during rendering.
///
/// # Example
///
/// ```
/// use widget_dashboard::widgets::WidgetContext;
///
/// let ctx = WidgetContext::new(chrono::Local::now()).with_tick(3);
/// assert_eq!(ctx.tick, 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WidgetContext {
    /// Wall-clock time of the frame being drawn.
    pub now: DateTime<Local>,

    /// Count of ticks since the dashboard started.
    pub tick: u64,
}

impl WidgetContext {
    /// Creates a context for a frame drawn at `now`.
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now, tick: 0 }
    }

    /// Sets the tick counter.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}
