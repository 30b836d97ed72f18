//! Core library for rollcall.
//!
//! Marks who came to today's trainings at a sports school: pick a venue,
//! pick a session, tick the students who are present, add anyone from
//! outside the schedule, and submit. This crate has no terminal or UI code;
//! front ends drive a [`Wizard`] and draw the view models it produces.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod store;
pub mod view;
pub mod wizard;

pub use api::{ApiClient, ApiError, AttendanceGateway};
pub use auth::OperatorContext;
pub use config::Config;
pub use store::{AddExtraOutcome, BackTarget, Step, ValidationError, WizardState};
pub use view::Layout;
pub use wizard::{SearchPanel, StatusOverlay, Wizard, WizardEvent, SEARCH_DEBOUNCE};
