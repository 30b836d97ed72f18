//! Wizard state for the visits-today flow.
//!
//! `WizardState` is the single owner of everything the user has chosen:
//! step, venue, session, the roster's Selection Set, the Extra Roster of
//! ad-hoc attendees and the pending search timer. It performs no I/O.
//!
//! Invariants kept by every mutation:
//! - step 1: no venue, no session, nothing selected
//! - step 2: venue set, no session
//! - step 3: venue and session set
//! - no person id is both selected on the roster and in the Extra Roster

use std::collections::BTreeSet;

use thiserror::Error;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::api::MIN_SEARCH_CHARS;
use crate::models::{Person, PersonId, Session, SessionId, Venue};

/// Wizard steps, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Venues = 1,
    Sessions = 2,
    Roster = 3,
}

impl Step {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Venues => "Choose a venue",
            Step::Sessions => "Choose a training",
            Step::Roster => "Mark attendance",
        }
    }
}

/// Where a back-navigation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackTarget {
    Venues,
    Sessions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddExtraOutcome {
    Added,
    /// Already in the Extra Roster
    AlreadyAdded,
    /// Enrolled in this session; mark them on the roster instead
    OnRoster,
}

/// Problems caught before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select at least one student")]
    EmptySelection,

    #[error("Type at least {0} characters to search")]
    QueryTooShort(usize),

    #[error("No training selected")]
    NoSession,
}

/// Trim a search query and check its length.
pub fn validate_query(raw: &str) -> Result<&str, ValidationError> {
    let query = raw.trim();
    if query.chars().count() < MIN_SEARCH_CHARS {
        Err(ValidationError::QueryTooShort(MIN_SEARCH_CHARS))
    } else {
        Ok(query)
    }
}

/// What a save sends: the session, roster ids marked present, and extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceDraft {
    pub session_id: SessionId,
    pub student_ids: Vec<PersonId>,
    pub extra_students: Vec<Person>,
}

#[derive(Debug)]
struct PendingSearch {
    token: u64,
    handle: AbortHandle,
}

#[derive(Debug)]
pub struct WizardState {
    step: Step,
    venue: Option<Venue>,
    session: Option<Session>,
    roster: Vec<Person>,
    selected: BTreeSet<PersonId>,
    extras: Vec<Person>,
    pending_search: Option<PendingSearch>,
    search_seq: u64,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: Step::Venues,
            venue: None,
            session: None,
            roster: Vec::new(),
            selected: BTreeSet::new(),
            extras: Vec::new(),
            pending_search: None,
            search_seq: 0,
        }
    }

    // ===== Accessors =====

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn venue(&self) -> Option<&Venue> {
        self.venue.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn roster(&self) -> &[Person] {
        &self.roster
    }

    pub fn selected(&self) -> &BTreeSet<PersonId> {
        &self.selected
    }

    pub fn is_selected(&self, id: PersonId) -> bool {
        self.selected.contains(&id)
    }

    pub fn extras(&self) -> &[Person] {
        &self.extras
    }

    pub fn has_extra(&self, id: PersonId) -> bool {
        self.extras.iter().any(|p| p.id == id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn extra_count(&self) -> usize {
        self.extras.len()
    }

    pub fn total_count(&self) -> usize {
        self.selected.len() + self.extras.len()
    }

    // ===== Navigation =====

    /// Step 1 → 2. Anything chosen under a previous venue is dropped.
    pub fn select_venue(&mut self, venue: Venue) {
        debug!(venue_id = venue.id, "Venue selected");
        self.clear_attendance();
        self.session = None;
        self.venue = Some(venue);
        self.step = Step::Sessions;
    }

    /// Step 2 → 3. Returns false (and changes nothing) without a venue.
    pub fn select_session(&mut self, session: Session) -> bool {
        if self.venue.is_none() {
            debug!(session_id = session.id, "Session selected without a venue, ignoring");
            return false;
        }
        debug!(session_id = session.id, "Session selected");
        self.clear_attendance();
        self.session = Some(session);
        self.step = Step::Roster;
        true
    }

    /// Back-navigation: clears selections, extras and the search timer.
    pub fn reset(&mut self, target: BackTarget) {
        self.clear_attendance();
        self.session = None;
        match target {
            BackTarget::Sessions => {
                if self.venue.is_some() {
                    self.step = Step::Sessions;
                } else {
                    self.step = Step::Venues;
                }
            }
            BackTarget::Venues => {
                self.venue = None;
                self.step = Step::Venues;
            }
        }
        debug!(step = self.step.number(), "Wizard reset");
    }

    fn clear_attendance(&mut self) {
        self.cancel_search();
        self.roster.clear();
        self.selected.clear();
        self.extras.clear();
    }

    // ===== Roster =====

    /// Replace the roster and seed the Selection Set from `is_visited`.
    /// Extras that turn out to be enrolled are dropped from the Extra Roster.
    pub fn seed_selection(&mut self, roster: Vec<Person>) {
        self.selected = roster.iter().filter(|p| p.is_visited).map(|p| p.id).collect();
        self.extras
            .retain(|extra| !roster.iter().any(|p| p.id == extra.id));
        self.roster = roster;
    }

    pub fn is_on_roster(&self, id: PersonId) -> bool {
        self.roster.iter().any(|p| p.id == id)
    }

    /// Flip a roster member's presence. Returns the new membership, or
    /// `None` when the id is not on the roster.
    pub fn toggle_attendee(&mut self, id: PersonId) -> Option<bool> {
        if !self.is_on_roster(id) {
            return None;
        }
        if self.selected.remove(&id) {
            Some(false)
        } else {
            self.selected.insert(id);
            Some(true)
        }
    }

    // ===== Extra Roster =====

    pub fn add_extra(&mut self, person: Person) -> AddExtraOutcome {
        if self.has_extra(person.id) {
            return AddExtraOutcome::AlreadyAdded;
        }
        if self.is_on_roster(person.id) {
            return AddExtraOutcome::OnRoster;
        }
        self.extras.push(person);
        AddExtraOutcome::Added
    }

    pub fn remove_extra(&mut self, id: PersonId) -> bool {
        let before = self.extras.len();
        self.extras.retain(|p| p.id != id);
        self.extras.len() != before
    }

    pub fn clear_extras(&mut self) {
        self.extras.clear();
    }

    // ===== Search debounce =====

    /// Cancel any pending search and register a new one. `spawn` receives
    /// the new token and returns a handle to the timer task.
    pub fn arm_search<F>(&mut self, spawn: F) -> u64
    where
        F: FnOnce(u64) -> AbortHandle,
    {
        self.cancel_search();
        self.search_seq += 1;
        let token = self.search_seq;
        let handle = spawn(token);
        self.pending_search = Some(PendingSearch { token, handle });
        token
    }

    pub fn cancel_search(&mut self) {
        if let Some(pending) = self.pending_search.take() {
            debug!(token = pending.token, "Search cancelled");
            pending.handle.abort();
        }
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn is_current_search(&self, token: u64) -> bool {
        self.pending_search
            .as_ref()
            .map(|p| p.token == token)
            .unwrap_or(false)
    }

    /// Mark the search `token` as delivered. Returns false if it is stale.
    pub fn finish_search(&mut self, token: u64) -> bool {
        if self.is_current_search(token) {
            self.pending_search = None;
            true
        } else {
            false
        }
    }

    // ===== Save =====

    /// The current attendance, or why it cannot be submitted.
    pub fn attendance_draft(&self) -> Result<AttendanceDraft, ValidationError> {
        let session = self.session.as_ref().ok_or(ValidationError::NoSession)?;
        if self.total_count() == 0 {
            return Err(ValidationError::EmptySelection);
        }
        Ok(AttendanceDraft {
            session_id: session.id,
            student_ids: self.selected.iter().copied().collect(),
            extra_students: self.extras.clone(),
        })
    }
}
