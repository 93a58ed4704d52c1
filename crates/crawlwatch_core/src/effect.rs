use crate::{JobId, PageQuery, UrlId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Login { username: String, password: String },
    ClearSession,
    LoadPage { request_id: u64, query: PageQuery },
    CreateUrl { url: String },
    StartJobs { url_ids: Vec<UrlId> },
    StopJobs { url_ids: Vec<UrlId> },
    FetchJobStatus { url_id: UrlId, job_id: JobId },
    FetchResult { url_id: UrlId },
    StartPoller,
    StopPoller,
}
