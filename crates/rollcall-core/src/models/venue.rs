use serde::{Deserialize, Serialize};

pub type VenueId = i64;

/// A physical training location that has at least one session today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
}
