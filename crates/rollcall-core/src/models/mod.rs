//! Data models for the attendance wizard.
//!
//! - `Venue`: a training location with sessions today
//! - `Session`: a scheduled training slot at a venue
//! - `Person`: a roster member or ad-hoc search result
//! - Attendance types: `AttendanceSubmission`, `AttendanceResult`, `AttendanceStatus`

pub mod attendance;
pub mod person;
pub mod session;
pub mod venue;

pub use attendance::{
    AttendanceResult, AttendanceStats, AttendanceStatus, AttendanceSubmission, SaveStatus,
    TrainingInfo,
};
pub use person::{Person, PersonId, DEFAULT_BELT};
pub use session::{Session, SessionId};
pub use venue::{Venue, VenueId};
