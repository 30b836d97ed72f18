use serde::{Deserialize, Serialize};

pub type SessionId = i64;

/// A scheduled training slot. The owning venue is known only from the
/// request that fetched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub sport_name: String,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
}

impl Session {
    /// "18:00 - 19:00", with "?" for a missing bound
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.time_start.as_deref().unwrap_or("?"),
            self.time_end.as_deref().unwrap_or("?")
        )
    }

    /// Button label: the server-provided display text, or one built the same way.
    pub fn label(&self) -> String {
        match self.display.as_deref() {
            Some(display) if !display.trim().is_empty() => display.to_string(),
            _ => format!(
                "{}-{} ({})",
                self.time_start.as_deref().unwrap_or("?"),
                self.time_end.as_deref().unwrap_or("?"),
                self.sport_name
            ),
        }
    }
}
