use crawlwatch_core::{AnalysisResult, JobId, JobStatus, StartedJob, UrlId, UrlItem};
use serde::Deserialize;

/// One page of the URL listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UrlPage {
    pub data: Vec<UrlItem>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Server-side state of a crawl job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobState {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of one gateway call, tagged with what it was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    LoggedIn(Result<(), GatewayError>),
    PageListed {
        request_id: u64,
        result: Result<UrlPage, GatewayError>,
    },
    UrlCreated(Result<UrlItem, GatewayError>),
    JobsStarted(Result<Vec<StartedJob>, GatewayError>),
    JobsStopped {
        url_ids: Vec<UrlId>,
        result: Result<(), GatewayError>,
    },
    JobStatus {
        url_id: UrlId,
        job_id: JobId,
        result: Result<JobState, GatewayError>,
    },
    ResultFetched {
        url_id: UrlId,
        result: Result<AnalysisResult, GatewayError>,
    },
    PollTick,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("unauthorized")]
    Unauthorized,
    /// Expected for results that do not exist yet.
    #[error("not found")]
    NotFound,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return GatewayError::Timeout;
        }
        if let Some(status) = err.status() {
            return GatewayError::HttpStatus(status.as_u16());
        }
        GatewayError::Network(err.to_string())
    }
}
