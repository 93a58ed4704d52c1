use crate::{AnalysisResult, JobId, JobStatus, UrlItem};

/// View-level join of a URL with its latest known job state and result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub item: UrlItem,
    pub job_id: Option<JobId>,
    pub status: Option<JobStatus>,
    pub job_error: Option<String>,
    pub result: Option<AnalysisResult>,
}

impl Row {
    pub fn new(item: UrlItem) -> Self {
        Self {
            item,
            job_id: None,
            status: None,
            job_error: None,
            result: None,
        }
    }
}

/// Partial update for a [`Row`]. `None` means "leave as is".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowPatch {
    pub job_id: Option<JobId>,
    pub status: Option<JobStatus>,
    pub job_error: Option<String>,
    pub result: Option<AnalysisResult>,
}

impl RowPatch {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn result(result: AnalysisResult) -> Self {
        Self {
            result: Some(result),
            ..Self::default()
        }
    }

    pub fn queued(job_id: JobId) -> Self {
        Self {
            job_id: Some(job_id),
            status: Some(JobStatus::Queued),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.job_id.is_none()
            && self.status.is_none()
            && self.job_error.is_none()
            && self.result.is_none()
    }
}

/// Field-wise last-write-wins merge. Absent patch fields never clear data,
/// so a status update and a result fetch for the same row may land in
/// either order. `job_error` travels with `status`: a status patch replaces
/// the error even when it carries none.
///
/// Stored results are append-only, so a result with a lower id than the one
/// already shown is a late answer to an older fetch and is dropped.
pub fn merge(row: &Row, patch: RowPatch) -> Row {
    let RowPatch {
        job_id,
        status,
        job_error,
        result,
    } = patch;
    Row {
        item: row.item.clone(),
        job_id: job_id.or(row.job_id),
        status: status.or(row.status),
        job_error: if status.is_some() {
            job_error
        } else {
            job_error.or_else(|| row.job_error.clone())
        },
        result: match (result, &row.result) {
            (Some(incoming), Some(current)) if is_older(&incoming, current) => {
                Some(current.clone())
            }
            (Some(incoming), _) => Some(incoming),
            (None, current) => current.clone(),
        },
    }
}

fn is_older(incoming: &AnalysisResult, current: &AnalysisResult) -> bool {
    matches!((incoming.id, current.id), (Some(new), Some(old)) if new < old)
}
