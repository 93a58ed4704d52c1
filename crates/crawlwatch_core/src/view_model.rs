use crate::{AnalysisResult, JobId, JobStatus, Notice, SessionState, SortField, SortOrder, UrlId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub rows: Vec<RowView>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub limit: u32,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    pub selected_count: usize,
    pub all_selected: bool,
    pub tracked_jobs: usize,
    pub notice: Option<Notice>,
    pub loading: bool,
    pub busy: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: UrlId,
    pub url: String,
    pub selected: bool,
    pub job_id: Option<JobId>,
    pub status: Option<JobStatus>,
    pub job_error: Option<String>,
    pub result: Option<AnalysisResult>,
}

impl AppViewModel {
    pub fn row(&self, id: UrlId) -> Option<&RowView> {
        self.rows.iter().find(|row| row.id == id)
    }
}
