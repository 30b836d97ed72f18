//! Keyboard input handling for the TUI.
//!
//! Keys are translated into `App` calls; the wizard does the rest.

use crossterm::event::{KeyCode, KeyEvent};
use rollcall_core::{StatusOverlay, Step};

use crate::app::{App, AppState, Focus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle attendance status overlay
    if !matches!(app.wizard.status_overlay(), StatusOverlay::Hidden) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('q')
        ) {
            app.wizard.hide_status();
        }
        return false;
    }

    // Search box swallows printable keys
    if app.wizard.step() == Step::Roster && app.focus == Focus::Search {
        handle_search_input(app, key);
        return false;
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.request_quit();
            return matches!(app.state, AppState::Quitting);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Esc => app.back(),
        _ => match app.wizard.step() {
            Step::Venues | Step::Sessions => {
                if key.code == KeyCode::Enter {
                    app.select_highlighted();
                }
            }
            Step::Roster => handle_roster_input(app, key),
        },
    }

    false
}

fn handle_roster_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('/') => app.focus_search(),
        KeyCode::Tab | KeyCode::BackTab => app.cycle_focus(),
        KeyCode::Char('s') => app.save(),
        KeyCode::Char('i') => app.toggle_status(),
        KeyCode::Char(' ') | KeyCode::Enter if app.focus == Focus::Roster => {
            app.toggle_highlighted();
        }
        KeyCode::Char('x') | KeyCode::Delete if app.focus == Focus::Extras => {
            app.remove_highlighted_extra();
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => app.leave_search(),
        KeyCode::Enter => app.add_highlighted_result(),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Char(c) => app.push_query_char(c),
        _ => {}
    }
}
