use ratatui::{layout::Rect, Frame};

use crate::app::App;

use super::render_buttons;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.wizard.venue_view();
    let title = format!(" Where are you training? ({}) ", view.len());
    render_buttons(frame, area, title, &view, |b| b.label.clone(), app.venue_selection);
}
