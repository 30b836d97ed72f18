//! HTTP client for the visits-today endpoints.
//!
//! This module provides the `ApiClient` struct, the reqwest-backed
//! `AttendanceGateway` used by the wizard at runtime.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{
    AttendanceResult, AttendanceStatus, AttendanceSubmission, Person, Session, SessionId, Venue,
    VenueId,
};

use super::{ApiError, AttendanceGateway, MIN_SEARCH_CHARS};

// ============================================================================
// Constants
// ============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const PLACES_PATH: &str = "/visits-today/get-places";
const TRAININGS_PATH: &str = "/visits-today/get-trainings";
const STUDENTS_PATH: &str = "/visits-today/get-students";
const SEARCH_PATH: &str = "/visits-today/search-extra-student";
const SAVE_PATH: &str = "/visits-today/save-attendance";
const STATUS_PATH: &str = "/visits-today/get-attendance-status";

/// API client for the visits-today endpoints.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` (scheme and host, optional path prefix).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given bearer token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode a JSON body; any non-2xx status or
    /// undecodable body is an error.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T, ApiError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            warn!(url = url, error = %e, "Request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        debug!(url = url, status = %status, bytes = text.len(), "Response received");

        if !status.is_success() {
            warn!(url = url, status = %status, "Server rejected request");
            return Err(ApiError::from_status(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!(url = url, error = %e, "Failed to parse response");
            ApiError::InvalidResponse(format!("{} from {}", e, url))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        self.send(self.client.get(&url), &url).await
    }
}

#[async_trait]
impl AttendanceGateway for ApiClient {
    async fn fetch_venues(&self) -> Result<Vec<Venue>, ApiError> {
        self.get(PLACES_PATH).await
    }

    async fn fetch_sessions(&self, venue_id: VenueId) -> Result<Vec<Session>, ApiError> {
        self.get(&format!("{}/{}", TRAININGS_PATH, venue_id)).await
    }

    async fn fetch_roster(&self, session_id: SessionId) -> Result<Vec<Person>, ApiError> {
        self.get(&format!("{}/{}", STUDENTS_PATH, session_id)).await
    }

    async fn search_person(&self, query: &str) -> Result<Vec<Person>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_CHARS {
            return Ok(vec![]);
        }

        let url = self.url(SEARCH_PATH);
        debug!(url = %url, query = query, "GET search");
        self.send(self.client.get(&url).query(&[("query", query)]), &url)
            .await
    }

    async fn submit_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<AttendanceResult, ApiError> {
        let url = self.url(SAVE_PATH);
        debug!(
            url = %url,
            schedule_id = submission.schedule_id,
            students = submission.student_ids.len(),
            extras = submission.extra_students.len(),
            "POST attendance"
        );
        self.send(self.client.post(&url).json(submission), &url).await
    }

    async fn fetch_attendance_status(
        &self,
        session_id: SessionId,
    ) -> Result<AttendanceStatus, ApiError> {
        self.get(&format!("{}/{}", STATUS_PATH, session_id)).await
    }
}
