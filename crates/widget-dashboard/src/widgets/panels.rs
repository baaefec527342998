//! Built-in business panels backed by mock data.
//!
//! Each panel renders a fixed snapshot. They exist so the layout engine has
//! real content to arrange; none of them fetch anything.

use chrono::{Datelike, Duration, Timelike};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Row, Sparkline, Table, Widget as _},
};

use super::{Widget, WidgetContext, WidgetError};

/// Renders `(label, value)` rows as a two-column table.
fn render_pairs(area: Rect, buf: &mut Buffer, rows: Vec<(String, Span<'static>)>) {
    let value_width = rows
        .iter()
        .map(|(_, v)| v.width() as u16)
        .max()
        .unwrap_or(0);
    let rows: Vec<Row> = rows
        .into_iter()
        .map(|(label, value)| Row::new(vec![Line::raw(label), Line::from(value).right_aligned()]))
        .collect();
    Table::new(rows, [Constraint::Fill(1), Constraint::Length(value_width)])
        .column_spacing(1)
        .render(area, buf);
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

const CLAIMS: &[(&str, &str, ClaimState)] = &[
    ("CLM-1042", "Water damage, kitchen", ClaimState::Open),
    ("CLM-1039", "Windscreen", ClaimState::Approved),
    ("CLM-1033", "Storm, roof tiles", ClaimState::Review),
    ("CLM-1027", "Theft, bicycle", ClaimState::Denied),
    ("CLM-1021", "Burst pipe", ClaimState::Approved),
];

#[derive(Debug, Clone, Copy)]
enum ClaimState {
    Open,
    Review,
    Approved,
    Denied,
}

impl ClaimState {
    fn span(self) -> Span<'static> {
        match self {
            ClaimState::Open => Span::styled("open", Style::default().fg(Color::Yellow)),
            ClaimState::Review => Span::styled("review", Style::default().fg(Color::Cyan)),
            ClaimState::Approved => Span::styled("approved", Style::default().fg(Color::Green)),
            ClaimState::Denied => Span::styled("denied", Style::default().fg(Color::Red)),
        }
    }
}

/// Recent insurance claims and their state.
pub struct ClaimsWidget;

impl Widget for ClaimsWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, _ctx: &WidgetContext) -> Result<(), WidgetError> {
        let rows = CLAIMS
            .iter()
            .map(|(id, what, state)| (format!("{id} {what}"), state.span()))
            .collect();
        render_pairs(area, buf, rows);
        Ok(())
    }

    fn id(&self) -> &'static str {
        "claims"
    }
}

// ---------------------------------------------------------------------------
// Earnings
// ---------------------------------------------------------------------------

const WEEKLY_EARNINGS: &[u64] = &[12, 18, 15, 22, 19, 27, 31, 24, 29, 35, 33, 38];

/// Period totals with a weekly trend line.
pub struct EarningsWidget;

impl Widget for EarningsWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, _ctx: &WidgetContext) -> Result<(), WidgetError> {
        let [totals, trend] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);
        let money = |v: &str| Span::styled(v.to_string(), Style::default().fg(Color::Green));
        render_pairs(
            totals,
            buf,
            vec![
                ("Month to date".to_string(), money("$4,820")),
                ("Quarter to date".to_string(), money("$13,145")),
                ("Year to date".to_string(), money("$41,960")),
            ],
        );
        Sparkline::default()
            .data(WEEKLY_EARNINGS)
            .style(Style::default().fg(Color::Green))
            .render(trend, buf);
        Ok(())
    }

    fn id(&self) -> &'static str {
        "earnings"
    }
}

// ---------------------------------------------------------------------------
// Firms
// ---------------------------------------------------------------------------

const FIRMS: &[(&str, u32)] = &[
    ("Harbor & Pike LLP", 14),
    ("Northgate Adjusters", 9),
    ("Meridian Mutual", 7),
    ("Oakline Partners", 3),
];

/// Partner firms ranked by open files.
pub struct FirmsWidget;

impl Widget for FirmsWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, _ctx: &WidgetContext) -> Result<(), WidgetError> {
        let rows = FIRMS
            .iter()
            .map(|(name, files)| (name.to_string(), Span::raw(format!("{files} files"))))
            .collect();
        render_pairs(area, buf, rows);
        Ok(())
    }

    fn id(&self) -> &'static str {
        "firms"
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Local conditions; the heading follows the time of day.
pub struct WeatherWidget;

impl Widget for WeatherWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &WidgetContext) -> Result<(), WidgetError> {
        let heading = if (6..18).contains(&ctx.now.hour()) {
            "Today"
        } else {
            "Tonight"
        };
        let lines = vec![
            Line::from(Span::styled(
                heading,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("18°C ", Style::default().fg(Color::Yellow)),
                Span::raw("partly cloudy"),
            ]),
            Line::raw("Wind 12 km/h SW"),
            Line::raw("Rain 20%"),
        ];
        Paragraph::new(lines).render(area, buf);
        Ok(())
    }

    fn id(&self) -> &'static str {
        "weather"
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

const EVENTS: &[(i64, &str, &str)] = &[
    (0, "09:30", "Claims stand-up"),
    (0, "14:00", "Adjuster review"),
    (1, "11:00", "Quarterly audit prep"),
    (3, "16:00", "Broker lunch"),
];

/// Today's date and the next few events.
pub struct CalendarWidget;

impl Widget for CalendarWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &WidgetContext) -> Result<(), WidgetError> {
        let today = ctx.now.date_naive();
        let mut lines = vec![Line::from(Span::styled(
            format!("{} {} {}", today.weekday(), today.day(), today.format("%B")),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        for (offset, time, title) in EVENTS {
            let day = today + Duration::days(*offset);
            let when = if *offset == 0 {
                (*time).to_string()
            } else {
                format!("{} {time}", day.format("%a"))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{when:>9} "), Style::default().fg(Color::Cyan)),
                Span::raw(*title),
            ]));
        }
        Paragraph::new(lines).render(area, buf);
        Ok(())
    }

    fn id(&self) -> &'static str {
        "calendar"
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

const MESSAGES: &[(&str, &str, bool)] = &[
    ("R. Okafor", "Re: CLM-1042 photos", true),
    ("Underwriting", "Policy renewal batch", true),
    ("J. Lindqvist", "Lunch Thursday?", false),
    ("Support", "Ticket #5521 closed", false),
];

/// Inbox preview, unread first.
pub struct MessagesWidget;

impl Widget for MessagesWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, _ctx: &WidgetContext) -> Result<(), WidgetError> {
        let lines: Vec<Line> = MESSAGES
            .iter()
            .map(|(from, subject, unread)| {
                let style = if *unread {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(vec![
                    Span::styled(if *unread { "● " } else { "  " }, style),
                    Span::styled(format!("{from}: "), style),
                    Span::styled(*subject, style),
                ])
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
        Ok(())
    }

    fn id(&self) -> &'static str {
        "messages"
    }
}

// ---------------------------------------------------------------------------
// Compliance
// ---------------------------------------------------------------------------

const CHECKS: &[(&str, bool)] = &[
    ("KYC refresh", true),
    ("Data retention review", true),
    ("Licence renewals", false),
    ("AML training", true),
];

/// Compliance checklist with overall completion.
pub struct ComplianceWidget;

impl Widget for ComplianceWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, _ctx: &WidgetContext) -> Result<(), WidgetError> {
        let done = CHECKS.iter().filter(|(_, ok)| *ok).count();
        let ratio = done as f64 / CHECKS.len() as f64;
        let [gauge, list] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio)
            .label(format!("{done}/{} complete", CHECKS.len()))
            .render(gauge, buf);
        let lines: Vec<Line> = CHECKS
            .iter()
            .map(|(name, ok)| {
                let mark = if *ok {
                    Span::styled("✔ ", Style::default().fg(Color::Green))
                } else {
                    Span::styled("✘ ", Style::default().fg(Color::Red))
                };
                Line::from(vec![mark, Span::raw(*name)])
            })
            .collect();
        Paragraph::new(lines).render(list, buf);
        Ok(())
    }

    fn id(&self) -> &'static str {
        "compliance"
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

const TASKS: &[(&str, bool)] = &[
    ("Call back R. Okafor", false),
    ("Upload storm photos", true),
    ("Approve CLM-1039 payout", true),
    ("Draft audit checklist", false),
    ("Renew adjuster licence", false),
];

/// Personal task list.
pub struct TasksWidget;

impl Widget for TasksWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, _ctx: &WidgetContext) -> Result<(), WidgetError> {
        let lines: Vec<Line> = TASKS
            .iter()
            .map(|(task, done)| {
                if *done {
                    Line::from(Span::styled(
                        format!("[x] {task}"),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT),
                    ))
                } else {
                    Line::raw(format!("[ ] {task}"))
                }
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
        Ok(())
    }

    fn id(&self) -> &'static str {
        "tasks"
    }
}
