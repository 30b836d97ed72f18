//! The visits-today wizard: venue → session → attendance.
//!
//! `Wizard` binds the gateway, the `WizardState` store and the view models.
//! User actions mutate state synchronously and spawn gateway calls as tokio
//! tasks; their results come back over an mpsc channel and are applied by
//! `poll_events` (or `next_event`) on the owning loop. Every result carries
//! the venue, session or search token it was issued for and is dropped if
//! the wizard has moved on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, AttendanceGateway};
use crate::auth::OperatorContext;
use crate::models::{
    AttendanceResult, AttendanceStatus, AttendanceSubmission, Person, PersonId, Session,
    SessionId, Venue, VenueId,
};
use crate::store::{validate_query, AddExtraOutcome, BackTarget, Step, WizardState};
use crate::view::{
    self, CountBadge, ExtraRow, Layout, ListView, Notice, NoticeLevel, NoticeQueue, RosterRow,
    SearchRow, SessionButton, StatusSummary, Taken, VenueButton,
};

// ============================================================================
// Constants
// ============================================================================

/// Quiet period after the last keystroke before a search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Buffer size for the gateway result channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// A finished gateway call, tagged with what it was issued for.
#[derive(Debug)]
pub enum WizardEvent {
    Venues(Result<Vec<Venue>, ApiError>),
    Sessions {
        venue_id: VenueId,
        result: Result<Vec<Session>, ApiError>,
    },
    Roster {
        session_id: SessionId,
        result: Result<Vec<Person>, ApiError>,
    },
    Search {
        token: u64,
        result: Result<Vec<Person>, ApiError>,
    },
    Saved {
        session_id: SessionId,
        result: Result<AttendanceResult, ApiError>,
    },
    Status {
        session_id: SessionId,
        result: Result<AttendanceStatus, ApiError>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchPanel {
    #[default]
    Hidden,
    Searching,
    Results(Vec<Person>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusOverlay {
    #[default]
    Hidden,
    Loading,
    Shown(AttendanceStatus),
}

pub struct Wizard {
    gateway: Arc<dyn AttendanceGateway>,
    operator: OperatorContext,
    state: WizardState,

    // Fetched lists; `None` while loading
    venues: Option<Vec<Venue>>,
    sessions: Option<Vec<Session>>,
    roster_loaded: bool,

    search_query: String,
    search: SearchPanel,
    status: StatusOverlay,
    save_in_flight: bool,
    notices: NoticeQueue,

    events_tx: mpsc::Sender<WizardEvent>,
    events_rx: mpsc::Receiver<WizardEvent>,
}

impl Wizard {
    pub fn new(gateway: Arc<dyn AttendanceGateway>, operator: OperatorContext) -> Self {
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            gateway,
            operator,
            state: WizardState::new(),
            venues: None,
            sessions: None,
            roster_loaded: false,
            search_query: String::new(),
            search: SearchPanel::Hidden,
            status: StatusOverlay::Hidden,
            save_in_flight: false,
            notices: NoticeQueue::default(),
            events_tx,
            events_rx,
        }
    }

    // ===== Accessors =====

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    pub fn venues(&self) -> Option<&[Venue]> {
        self.venues.as_deref()
    }

    pub fn sessions(&self) -> Option<&[Session]> {
        self.sessions.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_panel(&self) -> &SearchPanel {
        &self.search
    }

    pub fn status_overlay(&self) -> &StatusOverlay {
        &self.status
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    // ===== Views =====

    pub fn venue_view(&self) -> ListView<VenueButton> {
        view::venue_list(self.venues())
    }

    pub fn session_view(&self) -> ListView<SessionButton> {
        view::session_list(self.sessions())
    }

    pub fn roster_view(&self, layout: Layout) -> ListView<RosterRow> {
        let roster = self.roster_loaded.then(|| self.state.roster());
        view::roster_rows(roster, self.state.selected(), layout)
    }

    /// `None` while the results panel is hidden.
    pub fn search_view(&self, layout: Layout) -> Option<ListView<SearchRow>> {
        let taken = |id: PersonId| {
            if self.state.is_on_roster(id) {
                Some(Taken::Roster)
            } else if self.state.has_extra(id) {
                Some(Taken::Extra)
            } else {
                None
            }
        };
        match self.search {
            SearchPanel::Hidden => None,
            SearchPanel::Searching => Some(view::search_rows(None, layout, taken)),
            SearchPanel::Results(ref results) => {
                Some(view::search_rows(Some(results.as_slice()), layout, taken))
            }
        }
    }

    pub fn extras_view(&self, layout: Layout) -> ListView<ExtraRow> {
        view::extra_rows(self.state.extras(), layout)
    }

    pub fn count_badge(&self) -> CountBadge {
        view::count_badge(self.state.selected_count(), self.state.extra_count())
    }

    pub fn status_view(&self, layout: Layout) -> Option<StatusSummary> {
        match self.status {
            StatusOverlay::Shown(ref status) => Some(view::status_summary(status, layout)),
            _ => None,
        }
    }

    // ===== Navigation =====

    /// Load venues. Called on entry and when returning to step 1.
    pub fn start(&mut self) {
        info!("Loading venues");
        self.venues = None;
        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move { WizardEvent::Venues(gateway.fetch_venues().await) });
    }

    pub fn select_venue(&mut self, venue: Venue) {
        let venue_id = venue.id;
        self.clear_search();
        self.status = StatusOverlay::Hidden;
        self.roster_loaded = false;
        self.sessions = None;
        self.state.select_venue(venue);

        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move {
            WizardEvent::Sessions {
                venue_id,
                result: gateway.fetch_sessions(venue_id).await,
            }
        });
    }

    pub fn select_session(&mut self, session: Session) {
        let session_id = session.id;
        if !self.state.select_session(session) {
            warn!(session_id, "Session selected before a venue");
            return;
        }
        self.clear_search();
        self.status = StatusOverlay::Hidden;
        self.load_roster(session_id);
    }

    /// Step back: roster → sessions (cached list), sessions → venues (re-fetched).
    pub fn back(&mut self) {
        self.clear_search();
        self.status = StatusOverlay::Hidden;
        self.roster_loaded = false;
        match self.state.step() {
            Step::Roster => {
                self.state.reset(BackTarget::Sessions);
            }
            Step::Sessions => {
                self.state.reset(BackTarget::Venues);
                self.sessions = None;
                self.start();
            }
            Step::Venues => {}
        }
    }

    fn load_roster(&mut self, session_id: SessionId) {
        self.roster_loaded = false;
        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move {
            WizardEvent::Roster {
                session_id,
                result: gateway.fetch_roster(session_id).await,
            }
        });
    }

    // ===== Roster =====

    pub fn toggle(&mut self, id: PersonId) -> Option<bool> {
        let checked = self.state.toggle_attendee(id);
        debug!(id, ?checked, "Toggled attendee");
        checked
    }

    // ===== Search =====

    /// New contents of the search box. Each call restarts the debounce timer;
    /// queries under the minimum length hide the results without searching.
    pub fn search_input(&mut self, text: &str) {
        self.search_query = text.to_string();
        self.state.cancel_search();

        let query = match validate_query(text) {
            Ok(query) => query.to_string(),
            Err(_) => {
                self.search = SearchPanel::Hidden;
                return;
            }
        };

        if self.search == SearchPanel::Hidden {
            self.search = SearchPanel::Searching;
        }

        let gateway = Arc::clone(&self.gateway);
        let tx = self.events_tx.clone();
        self.state.arm_search(|token| {
            tokio::spawn(async move {
                tokio::time::sleep(SEARCH_DEBOUNCE).await;
                debug!(token, query = %query, "Search debounce elapsed");
                // Detached so that a later keystroke does not abort the request
                tokio::spawn(async move {
                    let result = gateway.search_person(&query).await;
                    send_event(&tx, WizardEvent::Search { token, result }).await;
                });
            })
            .abort_handle()
        });
    }

    pub fn clear_search(&mut self) {
        self.state.cancel_search();
        self.search_query.clear();
        self.search = SearchPanel::Hidden;
    }

    // ===== Extra Roster =====

    pub fn add_extra(&mut self, person: Person) -> AddExtraOutcome {
        let id = person.id;
        let outcome = self.state.add_extra(person);
        match outcome {
            AddExtraOutcome::Added => {
                debug!(id, "Extra student added");
                self.clear_search();
                self.notify(Notice::toast(NoticeLevel::Success, "Student added"));
            }
            AddExtraOutcome::AlreadyAdded => {
                self.notify(Notice::toast(
                    NoticeLevel::Warning,
                    "This student is already added",
                ));
            }
            AddExtraOutcome::OnRoster => {
                self.notify(Notice::toast(
                    NoticeLevel::Warning,
                    "This student is on the roster, mark them there",
                ));
            }
        }
        outcome
    }

    pub fn remove_extra(&mut self, id: PersonId) -> bool {
        self.state.remove_extra(id)
    }

    // ===== Save and status =====

    pub fn save(&mut self) {
        if self.save_in_flight {
            self.notify(Notice::toast(NoticeLevel::Warning, "Save already in progress"));
            return;
        }

        let draft = match self.state.attendance_draft() {
            Ok(draft) => draft,
            Err(e) => {
                debug!(error = %e, "Save rejected");
                self.notify(Notice::toast(NoticeLevel::Danger, e.to_string()));
                return;
            }
        };

        let session_id = draft.session_id;
        let submission = AttendanceSubmission {
            schedule_id: draft.session_id,
            student_ids: draft.student_ids,
            extra_students: draft.extra_students,
            trainer_id: self.operator.trainer_id(),
        };
        info!(
            session_id,
            students = submission.student_ids.len(),
            extras = submission.extra_students.len(),
            "Saving attendance"
        );

        self.save_in_flight = true;
        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move {
            WizardEvent::Saved {
                session_id,
                result: gateway.submit_attendance(&submission).await,
            }
        });
    }

    pub fn show_status(&mut self) {
        let Some(session_id) = self.state.session().map(|s| s.id) else {
            return;
        };
        self.status = StatusOverlay::Loading;
        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move {
            WizardEvent::Status {
                session_id,
                result: gateway.fetch_attendance_status(session_id).await,
            }
        });
    }

    pub fn hide_status(&mut self) {
        self.status = StatusOverlay::Hidden;
    }

    // ===== Notices =====

    pub fn notify(&mut self, notice: Notice) {
        debug!(level = notice.level.label(), message = %notice.message, "Notice");
        self.notices.push(notice);
    }

    /// Drop expired notices. Returns true if the screen needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notices.prune(now)
    }

    // ===== Gateway results =====

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = WizardEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            send_event(&tx, event).await;
        });
    }

    /// Apply every finished gateway call. Returns true if anything arrived.
    pub fn poll_events(&mut self) -> bool {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }
        let changed = !events.is_empty();
        for event in events {
            self.apply(event);
        }
        changed
    }

    /// Wait for the next gateway result and apply it.
    pub async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: WizardEvent) {
        match event {
            WizardEvent::Venues(result) => self.apply_venues(result),
            WizardEvent::Sessions { venue_id, result } => self.apply_sessions(venue_id, result),
            WizardEvent::Roster { session_id, result } => self.apply_roster(session_id, result),
            WizardEvent::Search { token, result } => self.apply_search(token, result),
            WizardEvent::Saved { session_id, result } => self.apply_saved(session_id, result),
            WizardEvent::Status { session_id, result } => self.apply_status(session_id, result),
        }
    }

    fn is_current_session(&self, session_id: SessionId) -> bool {
        self.state.step() == Step::Roster && self.state.session().map(|s| s.id) == Some(session_id)
    }

    fn apply_venues(&mut self, result: Result<Vec<Venue>, ApiError>) {
        if self.state.step() != Step::Venues {
            debug!("Dropping venues received after leaving step 1");
            return;
        }
        match result {
            Ok(venues) => {
                debug!(count = venues.len(), "Venues loaded");
                self.venues = Some(venues);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load venues");
                self.venues = Some(vec![]);
                self.notify_failure("Failed to load venues", &e);
            }
        }
    }

    fn apply_sessions(&mut self, venue_id: VenueId, result: Result<Vec<Session>, ApiError>) {
        let current = self.state.step() == Step::Sessions
            && self.state.venue().map(|v| v.id) == Some(venue_id);
        if !current {
            debug!(venue_id, "Dropping stale sessions");
            return;
        }
        match result {
            Ok(sessions) => {
                debug!(venue_id, count = sessions.len(), "Sessions loaded");
                self.sessions = Some(sessions);
            }
            Err(e) => {
                warn!(venue_id, error = %e, "Failed to load sessions");
                self.sessions = Some(vec![]);
                self.notify_failure("Failed to load trainings", &e);
            }
        }
    }

    fn apply_roster(&mut self, session_id: SessionId, result: Result<Vec<Person>, ApiError>) {
        if !self.is_current_session(session_id) {
            debug!(session_id, "Dropping stale roster");
            return;
        }
        self.roster_loaded = true;
        match result {
            Ok(roster) => {
                debug!(session_id, count = roster.len(), "Roster loaded");
                self.state.seed_selection(roster);
            }
            Err(e) => {
                // First load: select_session already emptied the roster.
                // Re-fetch after a save: keep what was on screen.
                warn!(session_id, error = %e, "Failed to load roster");
                self.notify_failure("Failed to load students", &e);
            }
        }
    }

    fn apply_search(&mut self, token: u64, result: Result<Vec<Person>, ApiError>) {
        if !self.state.finish_search(token) {
            debug!(token, "Dropping stale search results");
            return;
        }
        match result {
            Ok(results) => {
                debug!(token, count = results.len(), "Search results");
                self.search = SearchPanel::Results(results);
            }
            Err(e) => {
                warn!(token, error = %e, "Search failed");
                self.search = SearchPanel::Hidden;
                self.notify_failure("Search failed", &e);
            }
        }
    }

    fn apply_saved(&mut self, session_id: SessionId, result: Result<AttendanceResult, ApiError>) {
        self.save_in_flight = false;
        match result {
            Ok(saved) if saved.is_success() => {
                info!(session_id, saved = saved.saved_count, "Attendance saved");
                self.notify(Notice::toast(
                    NoticeLevel::Success,
                    format!("Saved {} visits", saved.saved_count),
                ));
                if !saved.errors.is_empty() {
                    warn!(session_id, errors = ?saved.errors, "Some visits were not saved");
                    let mut message = String::from("Some visits were not saved:");
                    for line in &saved.errors {
                        message.push('\n');
                        message.push_str(line);
                    }
                    self.notify(Notice::alert(NoticeLevel::Warning, message));
                }
                if self.is_current_session(session_id) {
                    self.state.clear_extras();
                    self.load_roster(session_id);
                }
            }
            Ok(saved) => {
                warn!(session_id, message = ?saved.message, "Server refused attendance");
                let message = saved
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Save failed".to_string());
                self.notify(Notice::toast(NoticeLevel::Danger, message));
            }
            Err(e) => {
                error!(session_id, error = %e, "Failed to save attendance");
                self.notify_failure("Failed to save attendance", &e);
            }
        }
    }

    fn apply_status(&mut self, session_id: SessionId, result: Result<AttendanceStatus, ApiError>) {
        if !self.is_current_session(session_id) || self.status != StatusOverlay::Loading {
            debug!(session_id, "Dropping stale attendance status");
            return;
        }
        match result {
            Ok(status) => self.status = StatusOverlay::Shown(status),
            Err(e) => {
                warn!(session_id, error = %e, "Failed to load attendance status");
                self.status = StatusOverlay::Hidden;
                self.notify_failure("Failed to load attendance status", &e);
            }
        }
    }

    fn notify_failure(&mut self, what: &str, error: &ApiError) {
        self.notify(Notice::toast(
            NoticeLevel::Danger,
            format!("{}: {}", what, error.user_message()),
        ));
    }
}

/// Send a result back to the wizard, logging if it has gone away.
async fn send_event(tx: &mpsc::Sender<WizardEvent>, event: WizardEvent) {
    if let Err(e) = tx.send(event).await {
        error!(error = %e, "Failed to deliver gateway result - channel closed");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::{AttendanceStats, SaveStatus, TrainingInfo};
    use crate::view::NoticeKind;

    const FAILING_VENUE: VenueId = 500;
    const FAILING_SESSION: SessionId = 66;

    /// In-memory server: one venue, one session, a roster that remembers visits.
    struct FakeGateway {
        roster: Mutex<HashMap<SessionId, Vec<Person>>>,
        pool: Vec<Person>,
        search_delay: Duration,
        save_delay: Duration,
        /// Roster fetches beyond this many answer with a 500.
        roster_budget: Option<usize>,
        save_reply: Mutex<Option<AttendanceResult>>,
        calls: Mutex<Vec<String>>,
        submissions: Mutex<Vec<AttendanceSubmission>>,
    }

    impl FakeGateway {
        fn new() -> Self {
            let mut roster = HashMap::new();
            roster.insert(10, vec![person(100, "Ivan Petrov", false)]);
            Self {
                roster: Mutex::new(roster),
                pool: vec![
                    person(7, "Anna Smirnova", false),
                    person(8, "Anatoly Orlov", false),
                    person(100, "Ivan Petrov", false),
                ],
                search_delay: Duration::ZERO,
                save_delay: Duration::ZERO,
                roster_budget: None,
                save_reply: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
                submissions: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, prefix: &str) -> usize {
            self.calls().iter().filter(|c| c.starts_with(prefix)).count()
        }
    }

    #[async_trait]
    impl AttendanceGateway for FakeGateway {
        async fn fetch_venues(&self) -> Result<Vec<Venue>, ApiError> {
            self.record("venues".to_string());
            Ok(vec![venue(1, "Gym A"), venue(FAILING_VENUE, "Gym Broken")])
        }

        async fn fetch_sessions(&self, venue_id: VenueId) -> Result<Vec<Session>, ApiError> {
            self.record(format!("sessions {}", venue_id));
            if venue_id == FAILING_VENUE {
                return Err(ApiError::ServerError {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(vec![judo()])
        }

        async fn fetch_roster(&self, session_id: SessionId) -> Result<Vec<Person>, ApiError> {
            self.record(format!("roster {}", session_id));
            let over_budget = self
                .roster_budget
                .is_some_and(|budget| self.count("roster") > budget);
            if session_id == FAILING_SESSION || over_budget {
                return Err(ApiError::ServerError {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(self
                .roster
                .lock()
                .unwrap()
                .get(&session_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn search_person(&self, query: &str) -> Result<Vec<Person>, ApiError> {
            self.record(format!("search {}", query));
            tokio::time::sleep(self.search_delay).await;
            let needle = query.trim().to_lowercase();
            Ok(self
                .pool
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn submit_attendance(
            &self,
            submission: &AttendanceSubmission,
        ) -> Result<AttendanceResult, ApiError> {
            self.record(format!("save {}", submission.schedule_id));
            self.submissions.lock().unwrap().push(submission.clone());
            tokio::time::sleep(self.save_delay).await;
            if let Some(reply) = self.save_reply.lock().unwrap().clone() {
                return Ok(reply);
            }
            let mut roster = self.roster.lock().unwrap();
            if let Some(students) = roster.get_mut(&submission.schedule_id) {
                for student in students.iter_mut() {
                    if submission.student_ids.contains(&student.id) {
                        student.is_visited = true;
                    }
                }
            }
            Ok(AttendanceResult {
                status: SaveStatus::Success,
                saved_count: (submission.student_ids.len() + submission.extra_students.len())
                    as u32,
                message: None,
                errors: vec![],
            })
        }

        async fn fetch_attendance_status(
            &self,
            session_id: SessionId,
        ) -> Result<AttendanceStatus, ApiError> {
            self.record(format!("status {}", session_id));
            let roster = self.roster.lock().unwrap().get(&session_id).cloned().unwrap_or_default();
            let (present, absent): (Vec<_>, Vec<_>) = roster.into_iter().partition(|p| p.is_visited);
            Ok(AttendanceStatus {
                training_info: TrainingInfo {
                    place_name: "Gym A".to_string(),
                    time_start: Some("18:00".to_string()),
                    time_end: Some("19:00".to_string()),
                    sport_name: "Judo".to_string(),
                },
                stats: AttendanceStats {
                    total: (present.len() + absent.len()) as u32,
                    present: present.len() as u32,
                    absent: absent.len() as u32,
                },
                present_students: present,
                absent_students: absent,
            })
        }
    }

    fn venue(id: VenueId, name: &str) -> Venue {
        Venue {
            id,
            name: name.to_string(),
        }
    }

    fn judo() -> Session {
        Session {
            id: 10,
            sport_name: "Judo".to_string(),
            time_start: Some("18:00".to_string()),
            time_end: Some("19:00".to_string()),
            display: Some("18:00-19:00 (Judo)".to_string()),
        }
    }

    fn person(id: PersonId, name: &str, visited: bool) -> Person {
        Person {
            id,
            name: name.to_string(),
            display_name: None,
            birth_year: Some(2012),
            belt_emoji: "🟡".to_string(),
            is_visited: visited,
        }
    }

    fn wizard_with(gateway: FakeGateway) -> (Wizard, Arc<FakeGateway>) {
        let gateway = Arc::new(gateway);
        let wizard = Wizard::new(
            gateway.clone(),
            OperatorContext::new(Some(3), None),
        );
        (wizard, gateway)
    }

    /// Drive the wizard to step 3 with the Judo roster loaded.
    async fn at_roster(gateway: FakeGateway) -> (Wizard, Arc<FakeGateway>) {
        let (mut wizard, gateway) = wizard_with(gateway);
        wizard.start();
        wizard.next_event().await;
        wizard.select_venue(venue(1, "Gym A"));
        wizard.next_event().await;
        wizard.select_session(judo());
        wizard.next_event().await;
        assert_eq!(wizard.step(), Step::Roster);
        (wizard, gateway)
    }

    fn latest_notice(wizard: &Wizard) -> (NoticeLevel, String) {
        let notice = wizard.notices().latest().expect("a notice");
        (notice.level, notice.message.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_visit_flow() {
        let (mut wizard, gateway) = wizard_with(FakeGateway::new());

        wizard.start();
        assert!(matches!(wizard.venue_view(), ListView::Loading(_)));
        wizard.next_event().await;
        assert_eq!(wizard.venue_view().items()[0].label, "Gym A");

        wizard.select_venue(venue(1, "Gym A"));
        assert_eq!(wizard.step(), Step::Sessions);
        wizard.next_event().await;
        assert_eq!(wizard.session_view().items()[0].label, "18:00-19:00 (Judo)");

        wizard.select_session(judo());
        wizard.next_event().await;
        let rows = wizard.roster_view(Layout::Wide);
        assert_eq!(rows.len(), 1);
        assert!(!rows.items()[0].checked);

        assert_eq!(wizard.toggle(100), Some(true));
        assert_eq!(wizard.count_badge().total(), 1);

        wizard.save();
        assert!(wizard.is_saving());
        wizard.next_event().await;
        assert_eq!(latest_notice(&wizard), (NoticeLevel::Success, "Saved 1 visits".to_string()));

        // Roster re-fetched with the server's visited flags
        wizard.next_event().await;
        assert!(wizard.state().is_selected(100));
        assert!(wizard.roster_view(Layout::Wide).items()[0].checked);
        assert_eq!(gateway.count("roster 10"), 2);

        let submissions = gateway.submissions.lock().unwrap().clone();
        assert_eq!(submissions[0].student_ids, vec![100]);
        assert_eq!(submissions[0].trainer_id, 3);
        assert!(submissions[0].extra_students.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_failure_leaves_empty_step_two() {
        let (mut wizard, _gateway) = wizard_with(FakeGateway::new());
        wizard.select_venue(venue(FAILING_VENUE, "Gym Broken"));
        wizard.next_event().await;

        assert_eq!(wizard.step(), Step::Sessions);
        assert!(matches!(wizard.session_view(), ListView::Empty(view::NO_SESSIONS)));
        let (level, message) = latest_notice(&wizard);
        assert_eq!(level, NoticeLevel::Danger);
        assert!(message.contains("server error (500)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_sessions_clears_without_refetch() {
        let (mut wizard, gateway) = at_roster(FakeGateway::new()).await;
        wizard.toggle(100);
        wizard.search_input("Anna");
        tokio::time::sleep(SEARCH_DEBOUNCE).await;
        wizard.next_event().await;
        let hit = match wizard.search_panel() {
            SearchPanel::Results(results) => results[0].clone(),
            other => panic!("expected results, got {other:?}"),
        };
        wizard.add_extra(hit);
        assert_eq!(wizard.count_badge().total(), 2);

        wizard.back();
        assert_eq!(wizard.step(), Step::Sessions);
        assert_eq!(wizard.state().total_count(), 0);
        assert_eq!(wizard.session_view().len(), 1);
        assert_eq!(gateway.count("sessions"), 1);

        wizard.back();
        assert_eq!(wizard.step(), Step::Venues);
        assert!(matches!(wizard.venue_view(), ListView::Loading(_)));
        wizard.next_event().await;
        assert_eq!(gateway.count("venues"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_queries_never_search() {
        let (mut wizard, gateway) = at_roster(FakeGateway::new()).await;
        wizard.search_input("a");
        wizard.search_input(" b ");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!wizard.poll_events());
        assert_eq!(gateway.count("search"), 0);
        assert!(wizard.search_view(Layout::Wide).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_sends_one_search() {
        let (mut wizard, gateway) = at_roster(FakeGateway::new()).await;
        wizard.search_input("a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        wizard.search_input("an");
        tokio::time::sleep(Duration::from_millis(100)).await;
        wizard.search_input("ana");
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(gateway.count("search"), 0);

        wizard.next_event().await;
        let searches: Vec<_> = gateway
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("search"))
            .collect();
        assert_eq!(searches, vec!["search ana".to_string()]);

        let results = wizard.search_view(Layout::Wide).expect("results visible");
        let names: Vec<_> = results.items().iter().map(|r| r.label.name.clone()).collect();
        assert_eq!(names, vec!["Anatoly Orlov"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_search_response_dropped() {
        let mut gateway = FakeGateway::new();
        gateway.search_delay = Duration::from_secs(1);
        let (mut wizard, gateway) = at_roster(gateway).await;

        wizard.search_input("an");
        tokio::time::sleep(SEARCH_DEBOUNCE + Duration::from_millis(10)).await;
        assert_eq!(gateway.count("search an"), 1);

        // Typed again while the first request is in flight
        wizard.search_input("anna");

        wizard.next_event().await;
        assert_eq!(wizard.search_panel(), &SearchPanel::Searching);

        wizard.next_event().await;
        match wizard.search_panel() {
            SearchPanel::Results(results) => {
                let ids: Vec<_> = results.iter().map(|p| p.id).collect();
                assert_eq!(ids, vec![7]);
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_extra_outcomes() {
        let (mut wizard, _gateway) = at_roster(FakeGateway::new()).await;
        wizard.search_input("Anna");

        assert_eq!(wizard.add_extra(person(7, "Anna Smirnova", false)), AddExtraOutcome::Added);
        assert_eq!(wizard.search_query(), "");
        assert!(wizard.search_view(Layout::Wide).is_none());
        assert!(!wizard.state().has_pending_search());
        assert_eq!(latest_notice(&wizard), (NoticeLevel::Success, "Student added".to_string()));

        assert_eq!(
            wizard.add_extra(person(7, "Anna Smirnova", false)),
            AddExtraOutcome::AlreadyAdded
        );
        assert_eq!(wizard.state().extra_count(), 1);
        assert_eq!(latest_notice(&wizard).0, NoticeLevel::Warning);

        assert_eq!(
            wizard.add_extra(person(100, "Ivan Petrov", false)),
            AddExtraOutcome::OnRoster
        );
        assert_eq!(wizard.state().extra_count(), 1);
        assert!(!wizard.state().is_selected(100));

        assert!(wizard.remove_extra(7));
        assert!(matches!(wizard.extras_view(Layout::Wide), ListView::Empty(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_save_never_submits() {
        let (mut wizard, gateway) = at_roster(FakeGateway::new()).await;
        wizard.save();

        assert!(!wizard.is_saving());
        assert_eq!(
            latest_notice(&wizard),
            (NoticeLevel::Danger, "Select at least one student".to_string())
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!wizard.poll_events());
        assert_eq!(gateway.count("save"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_save_while_in_flight_is_rejected() {
        let mut gateway = FakeGateway::new();
        gateway.save_delay = Duration::from_secs(2);
        let (mut wizard, gateway) = at_roster(gateway).await;

        wizard.toggle(100);
        wizard.save();
        wizard.save();
        assert_eq!(
            latest_notice(&wizard),
            (NoticeLevel::Warning, "Save already in progress".to_string())
        );

        wizard.next_event().await;
        assert!(!wizard.is_saving());
        assert_eq!(gateway.count("save"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_refusal_keeps_state() {
        let gateway = FakeGateway::new();
        *gateway.save_reply.lock().unwrap() = Some(AttendanceResult {
            status: SaveStatus::Error,
            saved_count: 0,
            message: Some("Schedule is closed".to_string()),
            errors: vec![],
        });
        let (mut wizard, gateway) = at_roster(gateway).await;

        wizard.toggle(100);
        wizard.add_extra(person(7, "Anna Smirnova", false));
        wizard.save();
        wizard.next_event().await;

        assert_eq!(
            latest_notice(&wizard),
            (NoticeLevel::Danger, "Schedule is closed".to_string())
        );
        assert!(wizard.state().is_selected(100));
        assert_eq!(wizard.state().extra_count(), 1);
        assert_eq!(gateway.count("roster"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_save_errors_raise_alert() {
        let gateway = FakeGateway::new();
        *gateway.save_reply.lock().unwrap() = Some(AttendanceResult {
            status: SaveStatus::Success,
            saved_count: 1,
            message: None,
            errors: vec!["Student 7: not found".to_string()],
        });
        let (mut wizard, _gateway) = at_roster(gateway).await;

        wizard.toggle(100);
        wizard.add_extra(person(7, "Anna Smirnova", false));
        wizard.save();
        wizard.next_event().await;

        let alert = wizard.notices().latest().expect("alert");
        assert_eq!(alert.kind, NoticeKind::Alert);
        assert!(alert.message.contains("Student 7: not found"));
        assert_eq!(wizard.state().extra_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_overlay() {
        let (mut wizard, _gateway) = at_roster(FakeGateway::new()).await;
        wizard.show_status();
        assert_eq!(wizard.status_overlay(), &StatusOverlay::Loading);
        wizard.next_event().await;

        let summary = wizard.status_view(Layout::Wide).expect("summary shown");
        assert_eq!(summary.stats_line, "Total: 1  Present: 0  Absent: 1");

        wizard.hide_status();
        assert!(wizard.status_view(Layout::Wide).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_roster_for_abandoned_session_dropped() {
        let (mut wizard, gateway) = wizard_with(FakeGateway::new());
        wizard.select_venue(venue(1, "Gym A"));
        wizard.next_event().await;
        wizard.select_session(judo());
        wizard.back();

        wizard.next_event().await;
        assert_eq!(wizard.step(), Step::Sessions);
        assert!(wizard.state().roster().is_empty());
        assert_eq!(gateway.count("roster"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_roster_failure_shows_toast_and_empty_step_three() {
        let (mut wizard, _gateway) = wizard_with(FakeGateway::new());
        wizard.select_venue(venue(1, "Gym A"));
        wizard.next_event().await;
        wizard.select_session(Session {
            id: FAILING_SESSION,
            ..judo()
        });
        wizard.next_event().await;

        assert_eq!(wizard.step(), Step::Roster);
        assert!(wizard.state().roster().is_empty());
        assert_eq!(wizard.roster_view(Layout::Wide), ListView::Empty(view::NO_STUDENTS));
        let (level, message) = latest_notice(&wizard);
        assert_eq!(level, NoticeLevel::Danger);
        assert!(message.starts_with("Failed to load students"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_failure_after_save_keeps_selection() {
        let mut gateway = FakeGateway::new();
        gateway.roster_budget = Some(1);
        let (mut wizard, gateway) = at_roster(gateway).await;

        wizard.toggle(100);
        wizard.save();
        wizard.next_event().await;
        wizard.next_event().await;

        assert_eq!(gateway.count("roster"), 2);
        assert_eq!(wizard.state().roster().len(), 1);
        assert!(wizard.state().is_selected(100));
        assert_eq!(wizard.roster_view(Layout::Wide).len(), 1);
        let (level, message) = latest_notice(&wizard);
        assert_eq!(level, NoticeLevel::Danger);
        assert!(message.starts_with("Failed to load students"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_notices_expire_on_tick() {
        let (mut wizard, _gateway) = wizard_with(FakeGateway::new());
        wizard.notify(Notice::toast(NoticeLevel::Info, "hello"));
        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(wizard.tick(Instant::now()));
        assert!(wizard.notices().is_empty());
    }
}
