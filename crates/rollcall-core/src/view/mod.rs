//! View models for the wizard.
//!
//! Everything here is a pure mapping from fetched data (and the current
//! selection) to plain structs a front end can draw. Nothing in this module
//! talks to the gateway or mutates wizard state.

pub mod names;
pub mod notice;

use std::collections::BTreeSet;

use crate::models::{AttendanceStatus, Person, PersonId, Session, SessionId, Venue, VenueId};

pub use names::{abbreviate, name_parts, strip_years, Layout};
pub use notice::{Notice, NoticeKind, NoticeLevel, NoticeQueue, ALERT_DURATION, TOAST_DURATION};

// Placeholders for empty lists
pub const NO_VENUES: &str = "No trainings today";
pub const NO_SESSIONS: &str = "No trainings at this venue today";
pub const NO_STUDENTS: &str = "No students enrolled in this training";
pub const NOTHING_FOUND: &str = "Nothing found";
pub const NO_EXTRAS: &str = "Add students from outside the schedule";

pub const LOADING_VENUES: &str = "Loading venues...";
pub const LOADING_SESSIONS: &str = "Loading trainings...";
pub const LOADING_STUDENTS: &str = "Loading students...";
pub const SEARCHING: &str = "Searching...";

/// A list section: still loading, empty with a placeholder, or rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<T> {
    Loading(&'static str),
    Empty(&'static str),
    Items(Vec<T>),
}

impl<T> ListView<T> {
    fn from_items(items: Vec<T>, empty: &'static str) -> Self {
        if items.is_empty() {
            ListView::Empty(empty)
        } else {
            ListView::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListView::Items(items) => items,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueButton {
    pub id: VenueId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionButton {
    pub id: SessionId,
    pub label: String,
}

/// Belt, name and optional year badge shared by every student row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonLabel {
    pub belt: String,
    pub name: String,
    pub year_badge: Option<String>,
}

impl PersonLabel {
    pub fn new(person: &Person, layout: Layout) -> Self {
        let (name, year_badge) = name_parts(&person.name, person.birth_year, layout);
        Self {
            belt: person.belt_emoji.clone(),
            name,
            year_badge,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub id: PersonId,
    pub checked: bool,
    pub label: PersonLabel,
}

/// Why a search hit cannot be added as an extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taken {
    Extra,
    Roster,
}

impl Taken {
    pub fn marker(self) -> &'static str {
        match self {
            Taken::Extra => "(added)",
            Taken::Roster => "(on roster)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRow {
    pub id: PersonId,
    pub label: PersonLabel,
    pub taken: Option<Taken>,
}

/// Extra rows always carry a remove affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraRow {
    pub id: PersonId,
    pub label: PersonLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBadge {
    pub selected: usize,
    pub extra: usize,
}

impl CountBadge {
    pub fn total(&self) -> usize {
        self.selected + self.extra
    }

    pub fn text(&self) -> String {
        if self.extra > 0 {
            format!("Selected: {} (+{} extra)", self.total(), self.extra)
        } else {
            format!("Selected: {}", self.total())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub title: String,
    pub time_range: String,
    pub present: ListView<PersonLabel>,
    pub absent: ListView<PersonLabel>,
    pub stats_line: String,
}

pub fn venue_list(venues: Option<&[Venue]>) -> ListView<VenueButton> {
    let Some(venues) = venues else {
        return ListView::Loading(LOADING_VENUES);
    };
    let buttons = venues
        .iter()
        .map(|v| VenueButton {
            id: v.id,
            label: v.name.clone(),
        })
        .collect();
    ListView::from_items(buttons, NO_VENUES)
}

pub fn session_list(sessions: Option<&[Session]>) -> ListView<SessionButton> {
    let Some(sessions) = sessions else {
        return ListView::Loading(LOADING_SESSIONS);
    };
    let buttons = sessions
        .iter()
        .map(|s| SessionButton {
            id: s.id,
            label: s.label(),
        })
        .collect();
    ListView::from_items(buttons, NO_SESSIONS)
}

pub fn roster_row(person: &Person, checked: bool, layout: Layout) -> RosterRow {
    RosterRow {
        id: person.id,
        checked,
        label: PersonLabel::new(person, layout),
    }
}

pub fn roster_rows(
    roster: Option<&[Person]>,
    selected: &BTreeSet<PersonId>,
    layout: Layout,
) -> ListView<RosterRow> {
    let Some(roster) = roster else {
        return ListView::Loading(LOADING_STUDENTS);
    };
    let rows = roster
        .iter()
        .map(|p| roster_row(p, selected.contains(&p.id), layout))
        .collect();
    ListView::from_items(rows, NO_STUDENTS)
}

/// `taken` reports ids that cannot be added again, and why.
pub fn search_rows<F>(results: Option<&[Person]>, layout: Layout, taken: F) -> ListView<SearchRow>
where
    F: Fn(PersonId) -> Option<Taken>,
{
    let Some(results) = results else {
        return ListView::Loading(SEARCHING);
    };
    let rows = results
        .iter()
        .map(|p| SearchRow {
            id: p.id,
            label: PersonLabel::new(p, layout),
            taken: taken(p.id),
        })
        .collect();
    ListView::from_items(rows, NOTHING_FOUND)
}

pub fn extra_rows(extras: &[Person], layout: Layout) -> ListView<ExtraRow> {
    let rows = extras
        .iter()
        .map(|p| ExtraRow {
            id: p.id,
            label: PersonLabel::new(p, layout),
        })
        .collect();
    ListView::from_items(rows, NO_EXTRAS)
}

pub fn count_badge(selected: usize, extra: usize) -> CountBadge {
    CountBadge { selected, extra }
}

pub fn status_summary(status: &AttendanceStatus, layout: Layout) -> StatusSummary {
    let info = &status.training_info;
    let labels = |people: &[Person]| -> Vec<PersonLabel> {
        people.iter().map(|p| PersonLabel::new(p, layout)).collect()
    };
    StatusSummary {
        title: format!("{}, {}", info.place_name, info.sport_name),
        time_range: format!(
            "{} - {}",
            info.time_start.as_deref().unwrap_or("?"),
            info.time_end.as_deref().unwrap_or("?")
        ),
        present: ListView::from_items(labels(&status.present_students), "Nobody marked yet"),
        absent: ListView::from_items(labels(&status.absent_students), "Everyone is here"),
        stats_line: format!(
            "Total: {}  Present: {}  Absent: {}",
            status.stats.total, status.stats.present, status.stats.absent
        ),
    }
}
