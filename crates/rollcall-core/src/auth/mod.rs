//! Operator identity for attendance submissions.
//!
//! Signing in is handled elsewhere; this module only carries the trainer id
//! and bearer token that the rest of the crate needs.

pub mod operator;

pub use operator::{OperatorContext, PLACEHOLDER_TRAINER_ID};
