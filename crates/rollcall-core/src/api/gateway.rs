use async_trait::async_trait;

use crate::models::{
    AttendanceResult, AttendanceStatus, AttendanceSubmission, Person, Session, SessionId, Venue,
    VenueId,
};

use super::ApiError;

/// Shortest (trimmed) query that is sent to the search endpoint.
pub const MIN_SEARCH_CHARS: usize = 2;

/// The calls the attendance wizard makes against the server.
#[async_trait]
pub trait AttendanceGateway: Send + Sync {
    /// Venues with at least one session today, in server order.
    async fn fetch_venues(&self) -> Result<Vec<Venue>, ApiError>;

    /// Today's sessions at a venue.
    async fn fetch_sessions(&self, venue_id: VenueId) -> Result<Vec<Session>, ApiError>;

    /// Enrolled students of a session with today's `is_visited` flags.
    async fn fetch_roster(&self, session_id: SessionId) -> Result<Vec<Person>, ApiError>;

    /// Name search across all active students.
    async fn search_person(&self, query: &str) -> Result<Vec<Person>, ApiError>;

    async fn submit_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<AttendanceResult, ApiError>;

    async fn fetch_attendance_status(
        &self,
        session_id: SessionId,
    ) -> Result<AttendanceStatus, ApiError>;
}
