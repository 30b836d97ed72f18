use ratatui::{layout::Rect, Frame};

use crate::app::App;

use super::render_buttons;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.wizard.session_view();
    let venue = app
        .wizard
        .state()
        .venue()
        .map(|v| v.name.as_str())
        .unwrap_or("");
    let title = format!(" Trainings at {} ({}) ", venue, view.len());
    render_buttons(frame, area, title, &view, |b| b.label.clone(), app.session_selection);
}
