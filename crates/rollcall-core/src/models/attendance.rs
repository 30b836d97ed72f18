use serde::{Deserialize, Serialize};

use super::{Person, PersonId, SessionId};

/// Body of `POST /visits-today/save-attendance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSubmission {
    pub schedule_id: SessionId,
    pub student_ids: Vec<PersonId>,
    pub extra_students: Vec<Person>,
    pub trainer_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

/// Outcome reported by the server for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceResult {
    pub status: SaveStatus,
    #[serde(default)]
    pub saved_count: u32,
    #[serde(default)]
    pub message: Option<String>,
    /// Per-student failures, capped server-side at five entries
    #[serde(default)]
    pub errors: Vec<String>,
}

impl AttendanceResult {
    pub fn is_success(&self) -> bool {
        self.status == SaveStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingInfo {
    pub place_name: String,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    pub sport_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub present: u32,
    #[serde(default)]
    pub absent: u32,
}

/// Present/absent breakdown for one session today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceStatus {
    pub training_info: TrainingInfo,
    #[serde(default)]
    pub present_students: Vec<Person>,
    #[serde(default)]
    pub absent_students: Vec<Person>,
    #[serde(default)]
    pub stats: AttendanceStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_wire_shape() {
        let submission = AttendanceSubmission {
            schedule_id: 10,
            student_ids: vec![100, 101],
            extra_students: vec![],
            trainer_id: 1,
        };
        let value = serde_json::to_value(&submission).expect("serialize submission");
        assert_eq!(
            value,
            serde_json::json!({
                "schedule_id": 10,
                "student_ids": [100, 101],
                "extra_students": [],
                "trainer_id": 1
            })
        );
    }

    #[test]
    fn test_parse_save_result() {
        let json = r#"{"status": "success", "message": "Saved 2", "saved_count": 2, "errors": []}"#;
        let result: AttendanceResult = serde_json::from_str(json).expect("parse result");
        assert!(result.is_success());
        assert_eq!(result.saved_count, 2);

        let json = r#"{"status": "partial"}"#;
        let result: AttendanceResult = serde_json::from_str(json).expect("parse unknown status");
        assert_eq!(result.status, SaveStatus::Unknown);
        assert!(!result.is_success());
    }

    #[test]
    fn test_parse_attendance_status() {
        let json = r#"{
            "training_info": {"place_name": "Gym A", "time_start": "18:00", "time_end": "19:00", "sport_name": "Judo"},
            "present_students": [{"id": 100, "name": "Ivan Petrov", "birth_year": 2012, "belt_emoji": "🟡", "display": "🟡 Ivan Petrov 2012"}],
            "absent_students": [],
            "stats": {"total": 1, "present": 1, "absent": 0}
        }"#;
        let status: AttendanceStatus = serde_json::from_str(json).expect("parse status");
        assert_eq!(status.training_info.place_name, "Gym A");
        assert_eq!(status.present_students.len(), 1);
        assert_eq!(status.stats.present, 1);
    }
}
