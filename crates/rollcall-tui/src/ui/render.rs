use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use rollcall_core::view::{ListView, NoticeKind};
use rollcall_core::{StatusOverlay, Step};

use crate::app::{App, AppState, Focus};
use crate::utils::{format_today, pad_between};

use super::steps::{person_spans, roster, sessions, venues};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Step indicator
            Constraint::Min(8),    // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_steps(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if !matches!(app.wizard.status_overlay(), StatusOverlay::Hidden) {
        render_status_overlay(frame, app);
    }

    render_alerts(frame, app);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  Rollcall  {}", app.step_context());
    let today = format!("{}  [?] Help ", format_today(chrono::Local::now().date_naive()));
    let padding = pad_between(&title, &today, area.width as usize);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(padding),
        Span::styled(today, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_steps(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.wizard.step();
    let steps = [Step::Venues, Step::Sessions, Step::Roster];

    let mut spans = vec![Span::raw(" ")];
    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", styles::muted_style()));
        }
        let label = format!("[{}] {}", step.number(), step.title());
        spans.push(Span::styled(label, styles::step_style(*step == current, *step < current)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.wizard.step() {
        Step::Venues => venues::render(frame, app, area),
        Step::Sessions => sessions::render(frame, app, area),
        Step::Roster => roster::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.wizard.step() {
        Step::Venues => "[Enter] select | [q]uit",
        Step::Sessions => "[Enter] select | [Esc] back | [q]uit",
        Step::Roster => match app.focus {
            Focus::Search => "[Enter] add | [Esc] done",
            Focus::Extras => "[x] remove | [Tab] roster | [s]ave",
            Focus::Roster => "[Space] mark | [/] search | [s]ave | [i]nfo | [Esc] back",
        },
    };

    let toast = app
        .wizard
        .notices()
        .visible()
        .iter()
        .rev()
        .find(|n| n.kind == NoticeKind::Toast);

    let (left_text, left_style) = match toast {
        Some(notice) => (format!(" {} ", notice.message), styles::notice_style(notice.level)),
        None if app.wizard.is_saving() => (" Saving...".to_string(), styles::muted_style()),
        None => (format!(" {} ", app.base_url), styles::muted_style()),
    };

    let right_text = format!(" {} ", shortcuts);
    let padding = pad_between(&left_text, &right_text, area.width as usize);

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(padding),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Alerts stack in the top-right corner until they expire.
fn render_alerts(frame: &mut Frame, app: &App) {
    let screen = frame.area();
    let width = 48.min(screen.width);
    let mut y = screen.y + 3;

    for notice in app.wizard.notices().visible() {
        if notice.kind != NoticeKind::Alert {
            continue;
        }
        let height = (notice.message.lines().count() as u16 + 2).min(10);
        if y + height > screen.bottom() {
            break;
        }
        let area = Rect::new(screen.right().saturating_sub(width), y, width, height);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", notice.level.label()))
            .borders(Borders::ALL)
            .border_style(styles::notice_style(notice.level));
        let paragraph = Paragraph::new(notice.message.clone())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, area);
        y += height;
    }
}

fn render_status_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(60, 22, frame.area());
    frame.render_widget(Clear, area);

    let layout = app.layout(frame.area().width);
    let mut lines = vec![];

    match app.wizard.status_view(layout) {
        None => {
            lines.push(Line::from(""));
            lines.push(Line::styled("  Loading attendance...", styles::muted_style()));
        }
        Some(summary) => {
            lines.push(Line::styled(format!(" {}", summary.title), styles::title_style()));
            lines.push(Line::styled(format!(" {}", summary.time_range), styles::muted_style()));
            lines.push(Line::from(""));
            lines.push(Line::styled(format!(" {}", summary.stats_line), styles::highlight_style()));
            lines.push(Line::from(""));

            for (heading, list) in [("Present", &summary.present), ("Absent", &summary.absent)] {
                lines.push(Line::styled(format!(" {}", heading), styles::highlight_style()));
                match list {
                    ListView::Items(labels) => {
                        for label in labels {
                            let mut spans = vec![Span::raw("  ")];
                            spans.extend(person_spans(label, 40));
                            lines.push(Line::from(spans));
                        }
                    }
                    ListView::Empty(message) | ListView::Loading(message) => {
                        lines.push(Line::styled(format!("  {}", message), styles::muted_style()));
                    }
                }
                lines.push(Line::from(""));
            }
        }
    }

    lines.push(Line::from(vec![
        Span::styled(" Press ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(" Attendance today ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::styled(format!(" Rollcall {}", version), styles::title_style()),
        Line::from(""),
        Line::styled(" Navigation", styles::highlight_style()),
        help_line("↑/↓", "Move"),
        help_line("Enter", "Select venue or training"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::styled(" Attendance", styles::highlight_style()),
        help_line("Space", "Mark present / absent"),
        help_line("/", "Search for an extra student"),
        help_line("Enter", "Add highlighted search result"),
        help_line("Tab", "Switch roster ↔ extra students"),
        help_line("x / Del", "Remove extra student"),
        help_line("s", "Save attendance"),
        help_line("i", "Today's attendance status"),
        Line::from(""),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
