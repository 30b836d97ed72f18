//! Remote gateway for the visits-today HTTP API.
//!
//! `AttendanceGateway` is the seam the wizard talks to; `ApiClient` is the
//! reqwest-backed implementation. Every call either yields the decoded body or
//! an `ApiError`. Application-level failures inside a decoded body (such as
//! `status: "error"` on save) are passed through untouched.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::ApiClient;
pub use error::ApiError;
pub use gateway::{AttendanceGateway, MIN_SEARCH_CHARS};
