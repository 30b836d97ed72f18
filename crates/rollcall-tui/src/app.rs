//! Application state for the rollcall terminal front end.
//!
//! `App` wraps the core `Wizard` with what only a terminal needs: which
//! overlay is open, which panel has focus, and the highlighted row of every
//! list. All attendance state lives in the wizard.

use rollcall_core::view::{Notice, NoticeLevel};
use rollcall_core::{Config, Layout, SearchPanel, StatusOverlay, Step, Wizard};
use tokio::time::Instant;
use tracing::debug;

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for the search box.
pub const MAX_QUERY_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Quitting,
}

/// Which panel of the attendance step receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Roster,
    Search,
    Extras,
}

pub struct App {
    pub wizard: Wizard,
    pub state: AppState,
    pub focus: Focus,

    // Selection indices
    pub venue_selection: usize,
    pub session_selection: usize,
    pub roster_selection: usize,
    pub search_selection: usize,
    pub extras_selection: usize,

    pub base_url: String,
    narrow_width: u16,
}

impl App {
    pub fn new(wizard: Wizard, config: &Config) -> Self {
        Self {
            wizard,
            state: AppState::Normal,
            focus: Focus::Roster,
            venue_selection: 0,
            session_selection: 0,
            roster_selection: 0,
            search_selection: 0,
            extras_selection: 0,
            base_url: config.base_url.clone(),
            narrow_width: config.narrow_width,
        }
    }

    pub fn layout(&self, width: u16) -> Layout {
        Layout::for_width(width, self.narrow_width)
    }

    /// Apply finished requests and expire notices. Returns true if anything changed.
    pub fn check_background_tasks(&mut self) -> bool {
        let arrived = self.wizard.poll_events();
        if arrived {
            self.clamp_selections();
        }
        let expired = self.wizard.tick(Instant::now());
        arrived || expired
    }

    // ===== List sizes =====

    fn venue_count(&self) -> usize {
        self.wizard.venues().map_or(0, |v| v.len())
    }

    fn session_count(&self) -> usize {
        self.wizard.sessions().map_or(0, |s| s.len())
    }

    fn roster_count(&self) -> usize {
        self.wizard.state().roster().len()
    }

    fn search_count(&self) -> usize {
        match self.wizard.search_panel() {
            SearchPanel::Results(results) => results.len(),
            _ => 0,
        }
    }

    fn extras_count(&self) -> usize {
        self.wizard.state().extra_count()
    }

    pub fn clamp_selections(&mut self) {
        self.venue_selection = clamp(self.venue_selection, self.venue_count());
        self.session_selection = clamp(self.session_selection, self.session_count());
        self.roster_selection = clamp(self.roster_selection, self.roster_count());
        self.search_selection = clamp(self.search_selection, self.search_count());
        self.extras_selection = clamp(self.extras_selection, self.extras_count());
        if self.focus == Focus::Extras && self.extras_count() == 0 {
            self.focus = Focus::Roster;
        }
    }

    // ===== Navigation =====

    /// Move the highlighted row of the focused list.
    pub fn move_selection(&mut self, delta: isize) {
        match self.wizard.step() {
            Step::Venues => {
                self.venue_selection = step_index(self.venue_selection, delta, self.venue_count());
            }
            Step::Sessions => {
                self.session_selection =
                    step_index(self.session_selection, delta, self.session_count());
            }
            Step::Roster => match self.focus {
                Focus::Roster => {
                    self.roster_selection =
                        step_index(self.roster_selection, delta, self.roster_count());
                }
                Focus::Search => {
                    self.search_selection =
                        step_index(self.search_selection, delta, self.search_count());
                }
                Focus::Extras => {
                    self.extras_selection =
                        step_index(self.extras_selection, delta, self.extras_count());
                }
            },
        }
    }

    /// Enter on steps 1 and 2.
    pub fn select_highlighted(&mut self) {
        match self.wizard.step() {
            Step::Venues => {
                let venue = self
                    .wizard
                    .venues()
                    .and_then(|v| v.get(self.venue_selection))
                    .cloned();
                if let Some(venue) = venue {
                    self.session_selection = 0;
                    self.wizard.select_venue(venue);
                }
            }
            Step::Sessions => {
                let session = self
                    .wizard
                    .sessions()
                    .and_then(|s| s.get(self.session_selection))
                    .cloned();
                if let Some(session) = session {
                    self.roster_selection = 0;
                    self.extras_selection = 0;
                    self.focus = Focus::Roster;
                    self.wizard.select_session(session);
                }
            }
            Step::Roster => self.toggle_highlighted(),
        }
    }

    pub fn back(&mut self) {
        match self.wizard.step() {
            Step::Venues => {}
            Step::Sessions => self.venue_selection = 0,
            Step::Roster => self.focus = Focus::Roster,
        }
        self.wizard.back();
    }

    // ===== Attendance step =====

    pub fn toggle_highlighted(&mut self) {
        let id = self
            .wizard
            .state()
            .roster()
            .get(self.roster_selection)
            .map(|p| p.id);
        if let Some(id) = id {
            self.wizard.toggle(id);
        }
    }

    pub fn focus_search(&mut self) {
        self.focus = Focus::Search;
        self.search_selection = 0;
    }

    pub fn leave_search(&mut self) {
        self.focus = Focus::Roster;
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Roster if self.extras_count() > 0 => Focus::Extras,
            Focus::Roster => Focus::Roster,
            Focus::Search | Focus::Extras => Focus::Roster,
        };
        debug!(focus = ?self.focus, "Focus changed");
    }

    pub fn push_query_char(&mut self, c: char) {
        let mut query = self.wizard.search_query().to_string();
        if query.chars().count() >= MAX_QUERY_LENGTH {
            return;
        }
        query.push(c);
        self.search_selection = 0;
        self.wizard.search_input(&query);
    }

    pub fn pop_query_char(&mut self) {
        let mut query = self.wizard.search_query().to_string();
        if query.pop().is_some() {
            self.search_selection = 0;
            self.wizard.search_input(&query);
        }
    }

    pub fn add_highlighted_result(&mut self) {
        let person = match self.wizard.search_panel() {
            SearchPanel::Results(results) => results.get(self.search_selection).cloned(),
            _ => None,
        };
        if let Some(person) = person {
            self.wizard.add_extra(person);
            self.clamp_selections();
        }
    }

    pub fn remove_highlighted_extra(&mut self) {
        let id = self
            .wizard
            .state()
            .extras()
            .get(self.extras_selection)
            .map(|p| p.id);
        if let Some(id) = id {
            self.wizard.remove_extra(id);
            self.clamp_selections();
        }
    }

    pub fn save(&mut self) {
        self.wizard.save();
    }

    pub fn toggle_status(&mut self) {
        match self.wizard.status_overlay() {
            StatusOverlay::Hidden => self.wizard.show_status(),
            _ => self.wizard.hide_status(),
        }
    }

    pub fn request_quit(&mut self) {
        if self.wizard.is_saving() {
            self.wizard.notify(Notice::toast(
                NoticeLevel::Warning,
                "Wait for the save to finish",
            ));
            return;
        }
        self.state = AppState::Quitting;
    }

    /// Header text for the current step.
    pub fn step_context(&self) -> String {
        let state = self.wizard.state();
        match (state.venue(), state.session()) {
            (Some(venue), Some(session)) => {
                format!("{}  |  {}  {}", venue.name, session.sport_name, session.time_range())
            }
            (Some(venue), None) => venue.name.clone(),
            _ => "Today's trainings".to_string(),
        }
    }
}

fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Move `index` by `delta` within `0..len`, stopping at the ends.
fn step_index(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = index as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_index_stops_at_ends() {
        assert_eq!(step_index(0, -1, 3), 0);
        assert_eq!(step_index(1, 1, 3), 2);
        assert_eq!(step_index(2, 1, 3), 2);
        assert_eq!(step_index(5, 1, 0), 0);
    }

    #[test]
    fn test_clamp_to_shorter_list() {
        assert_eq!(clamp(4, 2), 1);
        assert_eq!(clamp(4, 0), 0);
        assert_eq!(clamp(1, 5), 1);
    }
}
