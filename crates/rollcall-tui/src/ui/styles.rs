use ratatui::style::{Color, Modifier, Style};
use rollcall_core::view::NoticeLevel;

// Color palette, same roles as the web attendance page
pub const PRIMARY: Color = Color::Rgb(13, 110, 253);
pub const PRESENT: Color = Color::Rgb(25, 135, 84);
pub const INFO: Color = Color::Rgb(13, 202, 240);
pub const WARNING: Color = Color::Rgb(255, 193, 7);
pub const DANGER: Color = Color::Rgb(220, 53, 69);
pub const MUTED: Color = Color::Rgb(108, 117, 125);
const SELECTION_BG: Color = Color::Rgb(33, 37, 41);
const STATUS_BG: Color = Color::Rgb(24, 26, 30);

// Chrome
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        muted_style()
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(STATUS_BG).fg(Color::White)
}

/// Step indicator: current step bold and underlined, finished steps green.
pub fn step_style(current: bool, done: bool) -> Style {
    if current {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if done {
        Style::default().fg(PRESENT)
    } else {
        muted_style()
    }
}

// Lists
pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn selected_style() -> Style {
    Style::default().bg(SELECTION_BG).add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(WARNING)
}

pub fn checked_style() -> Style {
    Style::default().fg(PRESENT).add_modifier(Modifier::BOLD)
}

pub fn year_badge_style() -> Style {
    Style::default().fg(Color::White).bg(MUTED)
}

/// Remove markers on extra students.
pub fn error_style() -> Style {
    Style::default().fg(DANGER)
}

pub fn search_style() -> Style {
    Style::default().fg(INFO)
}

// Help overlay
pub fn help_key_style() -> Style {
    Style::default().fg(WARNING).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn notice_style(level: NoticeLevel) -> Style {
    match level {
        NoticeLevel::Info => Style::default().fg(INFO),
        NoticeLevel::Success => Style::default().fg(PRESENT),
        NoticeLevel::Warning => Style::default().fg(WARNING),
        NoticeLevel::Danger => Style::default().fg(DANGER).add_modifier(Modifier::BOLD),
    }
}
