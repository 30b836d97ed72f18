use tracing::warn;

/// Trainer id sent when no operator is configured. The server accepts it
/// and attributes the visits to its default trainer.
pub const PLACEHOLDER_TRAINER_ID: i64 = 1;

/// Who is marking attendance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorContext {
    trainer_id: Option<i64>,
    token: Option<String>,
}

impl OperatorContext {
    pub fn new(trainer_id: Option<i64>, token: Option<String>) -> Self {
        Self { trainer_id, token }
    }

    /// Trainer id for a submission, falling back to the placeholder.
    pub fn trainer_id(&self) -> i64 {
        match self.trainer_id {
            Some(id) => id,
            None => {
                warn!(
                    trainer_id = PLACEHOLDER_TRAINER_ID,
                    "No trainer id configured, using placeholder"
                );
                PLACEHOLDER_TRAINER_ID
            }
        }
    }

    pub fn has_trainer(&self) -> bool {
        self.trainer_id.is_some()
    }

    /// Get the bearer token if one is configured
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainer_id_falls_back_to_placeholder() {
        let operator = OperatorContext::default();
        assert!(!operator.has_trainer());
        assert_eq!(operator.trainer_id(), PLACEHOLDER_TRAINER_ID);

        let operator = OperatorContext::new(Some(42), Some("tok".to_string()));
        assert_eq!(operator.trainer_id(), 42);
        assert_eq!(operator.token(), Some("tok"));
    }
}
