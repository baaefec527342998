//! Per-widget fault boundary.
//!
//! A [`WidgetHost`] draws one widget inside a bordered frame. The widget
//! renders into a scratch buffer; only a successful render is copied to the
//! screen. An `Err` or a panic marks the host failed and a fallback panel
//! with a retry hint is drawn instead, leaving sibling widgets unaffected.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget as _, Wrap},
};
use tracing::{debug, warn};

use crate::grid::{GridController, Mutation};
use crate::widgets::{Widget, WidgetContext, WidgetDescriptor, WidgetFactory};

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is inside a widget fault boundary.
///
/// Panic hooks use this to tell a contained widget panic from a real crash.
pub fn is_containing_panic() -> bool {
    CONTAINING.with(Cell::get)
}

fn contain<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    let previous = CONTAINING.with(|c| c.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CONTAINING.with(|c| c.set(previous));
    result.map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "widget panicked".to_string()
    }
}

/// Decoration for one frame of a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostFrame {
    /// The host has keyboard focus.
    pub focused: bool,
    /// Edit mode is on; draw the remove control.
    pub edit_mode: bool,
}

/// Fault boundary around one widget instance.
pub struct WidgetHost {
    widget_id: &'static str,
    title: &'static str,
    factory: WidgetFactory,
    widget: Option<Box<dyn Widget>>,
    failure: Option<String>,
}

impl WidgetHost {
    /// Creates a host; the widget itself is built on first render.
    pub fn new(descriptor: &WidgetDescriptor) -> Self {
        Self {
            widget_id: descriptor.id,
            title: descriptor.title,
            factory: descriptor.factory,
            widget: None,
            failure: None,
        }
    }

    /// Id of the hosted widget.
    pub fn widget_id(&self) -> &'static str {
        self.widget_id
    }

    /// Message of the last failure, if the host is showing its fallback.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Clears the failure so the next render tries the widget again.
    ///
    /// Returns `false` if the host was not failed.
    pub fn retry(&mut self) -> bool {
        if self.failure.take().is_some() {
            debug!(widget_id = self.widget_id, "Retrying widget");
            true
        } else {
            false
        }
    }

    /// Removes the hosted widget from the dashboard. Only allowed in edit mode.
    pub fn request_remove(&self, grid: &mut GridController) -> Mutation {
        if !grid.edit_mode() {
            return Mutation::NoOp;
        }
        grid.remove_widget(self.widget_id)
    }

    /// Draws the frame and either the widget or its fallback panel.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, ctx: &WidgetContext, frame: HostFrame) {
        let block = self.block(frame);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }

        if self.failure.is_none() {
            if let Err(message) = self.render_widget(inner, buf, ctx) {
                warn!(widget_id = self.widget_id, error = %message, "Widget failed to render");
                self.failure = Some(message);
            }
        }
        if let Some(message) = &self.failure {
            render_fallback(inner, buf, self.title, message);
        }
    }

    fn render_widget(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        ctx: &WidgetContext,
    ) -> Result<(), String> {
        let mut scratch = Buffer::empty(area);
        let factory = self.factory;
        let slot = &mut self.widget;
        let outcome = contain(|| slot.get_or_insert_with(factory).render(area, &mut scratch, ctx));
        match outcome {
            Ok(Ok(())) => {
                buf.merge(&scratch);
                Ok(())
            }
            Ok(Err(e)) => Err(e.message),
            Err(panicked) => {
                // The instance may be half-updated; rebuild it on retry.
                self.widget = None;
                Err(panicked)
            }
        }
    }

    fn block(&self, frame: HostFrame) -> Block<'static> {
        let border_style = if frame.focused {
            Style::default().fg(Color::Yellow)
        } else if self.failure.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(if frame.focused {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(border_style)
            .title(Line::from(Span::styled(
                format!(" {} ", self.title),
                Style::default().add_modifier(Modifier::BOLD),
            )));
        if frame.edit_mode {
            block = block.title(
                Line::from(Span::styled(" [d] remove ", Style::default().fg(Color::Red)))
                    .right_aligned(),
            );
        }
        block
    }
}

impl std::fmt::Debug for WidgetHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetHost")
            .field("widget_id", &self.widget_id)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

fn render_fallback(area: Rect, buf: &mut Buffer, title: &str, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{title} is unavailable"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled("[r] Retry", Style::default().fg(Color::Yellow))),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
