//! Crawlwatch core: pure job-tracking state machine and view-model helpers.
mod effect;
mod jobs;
mod merge;
mod msg;
mod registry;
mod selection;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use jobs::JobTracker;
pub use merge::{merge, Row, RowPatch};
pub use msg::Msg;
pub use registry::{UrlRegistry, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use selection::Selection;
pub use state::{AppState, Notice, NoticeKind, SessionState};
pub use types::{
    AnalysisResult, JobId, JobStatus, PageQuery, SortField, SortOrder, StartedJob, UrlId, UrlItem,
};
pub use update::update;
pub use view_model::{AppViewModel, RowView};
