use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UrlId = i64;
pub type JobId = i64;

/// A submitted URL as listed by the crawl service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlItem {
    pub id: UrlId,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UrlItem {
    pub fn new(id: UrlId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// One entry of a successful batch start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedJob {
    pub url_id: UrlId,
    pub job_id: JobId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Stopped,
}

impl JobStatus {
    /// Completed, Failed and Stopped admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Stopped
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page analysis produced by a completed crawl job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub url_id: UrlId,
    #[serde(default)]
    pub html_version: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub headings_h1: u32,
    #[serde(default)]
    pub headings_h2: u32,
    #[serde(default)]
    pub headings_h3: u32,
    #[serde(default)]
    pub headings_h4: u32,
    #[serde(default)]
    pub headings_h5: u32,
    #[serde(default)]
    pub headings_h6: u32,
    #[serde(default)]
    pub internal_links_count: u32,
    #[serde(default)]
    pub external_links_count: u32,
    #[serde(default)]
    pub inaccessible_links_count: u32,
    #[serde(default)]
    pub has_login_form: bool,
}

impl AnalysisResult {
    pub fn headings(&self) -> [u32; 6] {
        [
            self.headings_h1,
            self.headings_h2,
            self.headings_h3,
            self.headings_h4,
            self.headings_h5,
            self.headings_h6,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Url,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Column name understood by the listing endpoint.
    pub fn as_query(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Url => "url",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "id" => Some(SortField::Id),
            "url" => Some(SortField::Url),
            "created_at" | "created" => Some(SortField::CreatedAt),
            "updated_at" | "updated" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_query(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Parameters of one listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
}
