//! Content area for each wizard step.

pub mod roster;
pub mod sessions;
pub mod venues;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use rollcall_core::view::{ListView, PersonLabel};

use crate::ui::styles;
use crate::utils::truncate;

/// The loading or empty message for a list, if it has no rows.
pub(crate) fn placeholder<T>(view: &ListView<T>) -> Option<Line<'static>> {
    match view {
        ListView::Loading(message) | ListView::Empty(message) => {
            Some(Line::styled(format!("  {}", message), styles::muted_style()))
        }
        ListView::Items(_) => None,
    }
}

pub(crate) fn titled_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused))
}

/// Belt, name and (on wide layouts) the year badge.
pub(crate) fn person_spans(label: &PersonLabel, max_name: usize) -> Vec<Span<'static>> {
    let mut spans = vec![
        Span::raw(format!("{} ", label.belt)),
        Span::styled(truncate(&label.name, max_name), styles::list_item_style()),
    ];
    if let Some(ref year) = label.year_badge {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", year), styles::year_badge_style()));
    }
    spans
}

/// A one-column list of buttons (venues, sessions).
pub(crate) fn render_buttons<T>(
    frame: &mut Frame,
    area: Rect,
    title: String,
    view: &ListView<T>,
    label: impl Fn(&T) -> String,
    selected: usize,
) {
    let block = titled_block(title, true);

    if let Some(line) = placeholder(view) {
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let max_len = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = view
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == selected {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let marker = if i == selected { "▶ " } else { "  " };
            ListItem::new(Line::from(format!("{}{}", marker, truncate(&label(item), max_len))))
                .style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(list, area, &mut state);
}
