//! Step 3: mark attendance, search and manage extra students.

use ratatui::{
    layout::{Constraint, Direction, Layout as Split, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use rollcall_core::Layout;

use crate::app::{App, Focus};
use crate::ui::styles;

use super::{person_spans, placeholder, titled_block};

/// Wide terminals: roster on the left, search and extras on the right.
/// Narrow terminals: everything stacked.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let layout = app.layout(area.width);

    let (roster_area, side_area) = match layout {
        Layout::Wide => {
            let chunks = Split::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            (chunks[0], chunks[1])
        }
        Layout::Narrow => {
            let chunks = Split::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(6), Constraint::Length(12)])
                .split(area);
            (chunks[0], chunks[1])
        }
    };

    render_roster(frame, app, roster_area, layout);

    let results = app.wizard.search_view(layout);
    let side = if results.is_some() {
        Split::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ])
            .split(side_area)
    } else {
        Split::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(0), Constraint::Min(3)])
            .split(side_area)
    };

    render_search_box(frame, app, side[0]);
    if results.is_some() {
        render_search_results(frame, app, side[1], layout);
    }
    render_extras(frame, app, side[2], layout);
}

fn render_roster(frame: &mut Frame, app: &App, area: Rect, layout: Layout) {
    let view = app.wizard.roster_view(layout);
    let badge = app.wizard.count_badge();
    let focused = app.focus == Focus::Roster;
    let block = titled_block(format!(" Students ({})  {} ", view.len(), badge.text()), focused);

    if let Some(line) = placeholder(&view) {
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let max_name = area.width.saturating_sub(18) as usize;
    let items: Vec<ListItem> = view
        .items()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let checkbox = if row.checked {
                Span::styled("[✓] ", styles::checked_style())
            } else {
                Span::styled("[ ] ", styles::muted_style())
            };
            let mut spans = vec![checkbox];
            spans.extend(person_spans(&row.label, max_name));

            let style = if focused && i == app.roster_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.roster_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Search;
    let query = app.wizard.search_query();
    let line = if focused {
        Line::from(vec![
            Span::styled(query.to_string(), styles::search_style()),
            Span::styled("▌", styles::search_style()),
        ])
    } else if query.is_empty() {
        Line::styled("Press / to find a student", styles::muted_style())
    } else {
        Line::styled(query.to_string(), styles::muted_style())
    };

    let block = titled_block(" Add student ".to_string(), focused);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_search_results(frame: &mut Frame, app: &App, area: Rect, layout: Layout) {
    let Some(view) = app.wizard.search_view(layout) else {
        return;
    };
    let focused = app.focus == Focus::Search;
    let block = titled_block(format!(" Found ({}) ", view.len()), focused);

    if let Some(line) = placeholder(&view) {
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let max_name = area.width.saturating_sub(14) as usize;
    let items: Vec<ListItem> = view
        .items()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = person_spans(&row.label, max_name);
            if let Some(taken) = row.taken {
                spans.push(Span::styled(format!(" {}", taken.marker()), styles::muted_style()));
            }
            let style = if focused && i == app.search_selection {
                styles::selected_style()
            } else if row.taken.is_some() {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.search_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_extras(frame: &mut Frame, app: &App, area: Rect, layout: Layout) {
    let view = app.wizard.extras_view(layout);
    let focused = app.focus == Focus::Extras;
    let block = titled_block(format!(" Extra students ({}) ", view.len()), focused);

    if let Some(line) = placeholder(&view) {
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let max_name = area.width.saturating_sub(14) as usize;
    let items: Vec<ListItem> = view
        .items()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = person_spans(&row.label, max_name);
            spans.push(Span::styled("  [x]", styles::error_style()));
            let style = if focused && i == app.extras_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.extras_selection));

    frame.render_stateful_widget(list, area, &mut state);
}
