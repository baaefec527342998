//! Main rendering orchestration for the TUI dashboard.
//!
//! Composes the header, notice banner, widget grid, footer and the
//! add-widget picker overlay.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::widgets::WidgetContext;

/// Header text displayed at the top of the dashboard.
const HEADER_TEXT: &str = "Widget Dashboard";

/// Key hints outside edit mode.
const FOOTER_VIEW: &str = "[e] Edit  [a] Add  [Tab] Focus  [r] Retry  [j/k] Scroll  [q] Quit";

/// Key hints in edit mode.
const FOOTER_EDIT: &str =
    "[e] Done  [hjkl] Move  [HJKL] Resize  [d] Remove  [c] Compact  [a] Add  [Tab] Focus  [q] Quit";

/// Key hints while the picker is open.
const FOOTER_PICKER: &str = "[j/k] Select  [Enter] Add  [Esc] Close";

/// Notices shown at once; the rest wait their turn.
const MAX_VISIBLE_NOTICES: usize = 3;

/// Renders the full dashboard and records the terminal width on `app`.
pub fn render_dashboard(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.width = area.width;

    let notice_rows = app.grid.notices().len().min(MAX_VISIBLE_NOTICES) as u16;
    let [header, notices, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(notice_rows),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, app, header);
    render_notices(frame, app, notices);

    if app.grid.active_widgets().is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "No widgets on the dashboard. Press [a] to add one.",
            Style::default().fg(Color::DarkGray),
        )))
        .centered();
        frame.render_widget(hint, body);
    } else {
        let ctx = WidgetContext::new(Local::now()).with_tick(app.tick_count);
        app.render_widgets(body, frame.buffer_mut(), &ctx);
    }

    let hints = if app.picker.is_some() {
        FOOTER_PICKER
    } else if app.grid.edit_mode() {
        FOOTER_EDIT
    } else {
        FOOTER_VIEW
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        footer,
    );

    if let Some(selected) = app.picker {
        render_picker(frame, app, selected, body);
    }
}

/// Title on the left, breakpoint and mode on the right.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut right = Vec::new();
    if let Some(bp) = app.breakpoint() {
        right.push(Span::styled(
            format!("{} · {} cols", bp.name, bp.cols),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if app.grid.edit_mode() {
        right.push(Span::raw(" "));
        right.push(Span::styled(
            " EDIT ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    let right_len: usize = right.iter().map(Span::width).sum();
    let padding = (area.width as usize)
        .saturating_sub(HEADER_TEXT.len())
        .saturating_sub(right_len);

    let mut spans = vec![
        Span::styled(HEADER_TEXT, Style::default().fg(Color::Cyan)),
        Span::raw(" ".repeat(padding)),
    ];
    spans.extend(right);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_notices(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .grid
        .notices()
        .iter()
        .take(MAX_VISIBLE_NOTICES)
        .enumerate()
        .map(|(i, notice)| {
            let mut spans = vec![Span::styled(
                format!("! {}", notice.message),
                Style::default().fg(Color::Red),
            )];
            if i == 0 {
                spans.push(Span::styled(
                    "  [x] dismiss",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_picker(frame: &mut Frame, app: &App, selected: usize, area: Rect) {
    let addable = app.grid.addable_widgets();
    let height = (addable.len().max(1) as u16).saturating_add(2);
    let popup = centered(area, 36, height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Add widget ");

    if addable.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "All widgets are on the dashboard",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, popup);
        return;
    }

    let items: Vec<ListItem> = addable
        .iter()
        .map(|d| {
            let size = d.sizing.default;
            ListItem::new(Line::from(vec![
                Span::raw(d.title),
                Span::styled(
                    format!("  {}x{}", size.w, size.h),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(selected.min(addable.len() - 1)));
    frame.render_stateful_widget(list, popup, &mut state);
}

/// Rectangle of at most `width` x `height` centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
