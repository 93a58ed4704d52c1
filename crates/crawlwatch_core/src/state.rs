use crate::jobs::JobTracker;
use crate::registry::UrlRegistry;
use crate::selection::Selection;
use crate::view_model::{AppViewModel, RowView};
use crate::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    SignedOut,
    SigningIn,
    SignedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    /// Login rejected; shown next to the login prompt.
    AuthFailure,
    /// Listing failed; rows keep their previous contents.
    LoadFailure,
    /// Create/start/stop failed; nothing was changed.
    ActionFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// The single authoritative state record owned by one view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    pub(crate) registry: UrlRegistry,
    pub(crate) jobs: JobTracker,
    pub(crate) selection: Selection,
    notice: Option<Notice>,
    load_seq: u64,
    loading: bool,
    busy: bool,
    poller_running: bool,
    poll_ticks: u64,
    torn_down: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(limit: u32) -> Self {
        Self {
            registry: UrlRegistry::with_limit(limit),
            ..Self::default()
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn registry(&self) -> &UrlRegistry {
        &self.registry
    }

    pub fn jobs(&self) -> &JobTracker {
        &self.jobs
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn poller_running(&self) -> bool {
        self.poller_running
    }

    pub fn poll_ticks(&self) -> u64 {
        self.poll_ticks
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn view(&self) -> AppViewModel {
        let (sort_field, sort_order) = self.registry.sort();
        let page_ids = self.registry.ids();
        let rows = self
            .registry
            .rows()
            .iter()
            .map(|row| RowView {
                id: row.item.id,
                url: row.item.url.clone(),
                selected: self.selection.contains(row.item.id),
                job_id: row.job_id,
                status: row.status,
                job_error: row.job_error.clone(),
                result: row.result.clone(),
            })
            .collect();
        AppViewModel {
            session: self.session,
            rows,
            page: self.registry.page(),
            total_pages: self.registry.total_pages(),
            total: self.registry.total(),
            limit: self.registry.limit(),
            sort_field,
            sort_order,
            selected_count: self.selection.len(),
            all_selected: !page_ids.is_empty()
                && page_ids.iter().all(|id| self.selection.contains(*id)),
            tracked_jobs: self.jobs.len(),
            notice: self.notice.clone(),
            loading: self.loading,
            busy: self.busy,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_session(&mut self, session: SessionState) {
        self.session = session;
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn clear_notice_of(&mut self, kind: NoticeKind) {
        if self.notice.as_ref().is_some_and(|notice| notice.kind == kind) {
            self.clear_notice();
        }
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.dirty = true;
    }

    /// Issues a new listing request; responses to older requests are dropped.
    pub(crate) fn request_page(&mut self) -> Effect {
        self.load_seq += 1;
        self.loading = true;
        self.dirty = true;
        Effect::LoadPage {
            request_id: self.load_seq,
            query: self.registry.query(),
        }
    }

    pub(crate) fn is_latest_load(&self, request_id: u64) -> bool {
        request_id == self.load_seq
    }

    pub(crate) fn finish_load(&mut self) {
        self.loading = false;
        self.dirty = true;
    }

    /// Emits `StartPoller` the first time tracking becomes non-empty.
    pub(crate) fn ensure_poller(&mut self) -> Option<Effect> {
        if self.poller_running || self.jobs.is_empty() {
            return None;
        }
        self.poller_running = true;
        Some(Effect::StartPoller)
    }

    /// Emits `StopPoller` once nothing is left to poll.
    pub(crate) fn release_poller(&mut self) -> Option<Effect> {
        if self.poller_running && self.jobs.is_empty() {
            self.poller_running = false;
            Some(Effect::StopPoller)
        } else {
            None
        }
    }

    pub(crate) fn next_poll_tick(&mut self) -> u64 {
        self.poll_ticks += 1;
        self.poll_ticks
    }

    /// Forgets everything tied to the signed-in view; page size survives.
    pub(crate) fn reset_view(&mut self) -> Option<Effect> {
        self.registry.clear();
        self.jobs.clear();
        self.selection.clear();
        self.loading = false;
        self.busy = false;
        self.dirty = true;
        if self.poller_running {
            self.poller_running = false;
            Some(Effect::StopPoller)
        } else {
            None
        }
    }

    pub(crate) fn tear_down(&mut self) -> Option<Effect> {
        self.torn_down = true;
        if self.poller_running {
            self.poller_running = false;
            Some(Effect::StopPoller)
        } else {
            None
        }
    }
}
