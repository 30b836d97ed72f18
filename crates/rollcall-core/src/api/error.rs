use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::ServerError {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }

    /// Short text for a notification; the full error goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkError(_) => "network error, check your connection".to_string(),
            ApiError::ServerError { status, .. } => format!("server error ({})", status),
            ApiError::InvalidResponse(_) => "unexpected server response".to_string(),
        }
    }
}
