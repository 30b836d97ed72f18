//! Utility functions for string formatting.

pub mod format;

pub use format::{format_today, pad_between, truncate};
