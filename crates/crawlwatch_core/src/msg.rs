use crate::{AnalysisResult, JobId, JobStatus, SortField, StartedJob, UrlId, UrlItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A stored session token was found at startup.
    SessionRestored,
    /// User submitted the login form.
    LoginSubmitted { username: String, password: String },
    LoginSucceeded,
    LoginFailed(String),
    LogoutClicked,
    /// User submitted a new URL for tracking.
    UrlSubmitted(String),
    UrlCreated(UrlItem),
    UrlCreateFailed(String),
    ReloadRequested,
    /// User asked for a page number (clamped to the available pages).
    PageRequested(i64),
    NextPage,
    PrevPage,
    PageSizeChanged(u32),
    /// User clicked a column header.
    SortClicked(SortField),
    PageLoaded {
        request_id: u64,
        page: u32,
        limit: u32,
        items: Vec<UrlItem>,
        total: u64,
    },
    PageLoadFailed { request_id: u64, error: String },
    SelectionToggled(UrlId),
    SelectAllToggled,
    StartSelectedClicked,
    JobsStarted(Vec<StartedJob>),
    JobsStartFailed(String),
    StopSelectedClicked,
    JobsStopped(Vec<UrlId>),
    JobsStopFailed(String),
    /// Periodic poller fired.
    PollTick,
    JobStatusReceived {
        url_id: UrlId,
        job_id: JobId,
        status: JobStatus,
        error: Option<String>,
    },
    JobStatusFailed { url_id: UrlId, job_id: JobId },
    ResultReceived { url_id: UrlId, result: AnalysisResult },
    /// No result stored yet, or the fetch failed.
    ResultUnavailable { url_id: UrlId },
    NoticeDismissed,
    /// The owning view is being destroyed.
    Shutdown,
    /// Fallback for placeholder wiring.
    NoOp,
}
