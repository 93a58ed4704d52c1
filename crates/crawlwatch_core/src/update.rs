use engine_logging::{engine_debug, engine_info};

use crate::{
    AnalysisResult, AppState, Effect, JobId, JobStatus, Msg, Notice, NoticeKind, RowPatch,
    SessionState, StartedJob, UrlId, MAX_PAGE_SIZE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    // Anything arriving after teardown belongs to a view that no longer exists.
    if state.is_torn_down() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Shutdown => state.tear_down().into_iter().collect(),
        Msg::SessionRestored => {
            if state.session() == SessionState::SignedIn {
                return (state, Vec::new());
            }
            state.set_session(SessionState::SignedIn);
            vec![state.request_page()]
        }
        Msg::LoginSubmitted { username, password } => login(&mut state, username, password),
        Msg::LoginSucceeded => {
            if state.session() != SessionState::SigningIn {
                return (state, Vec::new());
            }
            state.set_session(SessionState::SignedIn);
            state.clear_notice();
            state.registry.go_to(1);
            vec![state.request_page()]
        }
        Msg::LoginFailed(reason) => {
            if state.session() == SessionState::SigningIn {
                state.set_session(SessionState::SignedOut);
                state.set_notice(Notice::new(
                    NoticeKind::AuthFailure,
                    format!("Login failed: {reason}"),
                ));
            }
            Vec::new()
        }
        Msg::LogoutClicked => {
            if state.session() == SessionState::SignedOut {
                return (state, Vec::new());
            }
            state.set_session(SessionState::SignedOut);
            state.set_notice(Notice::new(NoticeKind::Info, "Signed out"));
            let mut effects = vec![Effect::ClearSession];
            effects.extend(state.reset_view());
            effects
        }
        Msg::NoticeDismissed => {
            state.clear_notice();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
        msg if state.session() != SessionState::SignedIn => {
            engine_debug!("Ignoring {:?} while signed out", msg);
            Vec::new()
        }
        Msg::UrlSubmitted(raw) => submit_url(&mut state, &raw),
        Msg::UrlCreated(item) => {
            engine_info!("Created url id={} url={}", item.id, item.url);
            state.set_notice(Notice::new(NoticeKind::Info, format!("Added {}", item.url)));
            vec![state.request_page()]
        }
        Msg::UrlCreateFailed(reason) => {
            state.set_notice(Notice::new(
                NoticeKind::ActionFailure,
                format!("Failed to add URL: {reason}"),
            ));
            Vec::new()
        }
        Msg::ReloadRequested => vec![state.request_page()],
        Msg::PageRequested(page) => go_to_page(&mut state, page),
        Msg::NextPage => {
            let next = i64::from(state.registry.page()) + 1;
            go_to_page(&mut state, next)
        }
        Msg::PrevPage => {
            let prev = i64::from(state.registry.page()) - 1;
            go_to_page(&mut state, prev)
        }
        Msg::PageSizeChanged(limit) => {
            if limit == 0 || limit > MAX_PAGE_SIZE {
                state.set_notice(Notice::new(
                    NoticeKind::ActionFailure,
                    format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                ));
                return (state, Vec::new());
            }
            state.registry.set_limit(limit);
            vec![state.request_page()]
        }
        Msg::SortClicked(field) => {
            state.registry.click_sort(field);
            vec![state.request_page()]
        }
        Msg::PageLoaded {
            request_id,
            page,
            limit,
            items,
            total,
        } => {
            if !state.is_latest_load(request_id) {
                engine_debug!("Dropping stale page load {}", request_id);
                return (state, Vec::new());
            }
            page_loaded(&mut state, page, limit, items, total)
        }
        Msg::PageLoadFailed { request_id, error } => {
            if state.is_latest_load(request_id) {
                state.finish_load();
                state.set_notice(Notice::new(
                    NoticeKind::LoadFailure,
                    format!("Failed to load URLs: {error}"),
                ));
            }
            Vec::new()
        }
        Msg::SelectionToggled(id) => {
            if state.registry.contains(id) {
                state.selection.toggle(id);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SelectAllToggled => {
            let ids = state.registry.ids();
            state.selection.toggle_all(&ids);
            state.mark_dirty();
            Vec::new()
        }
        Msg::StartSelectedClicked => match begin_batch(&mut state) {
            Some(url_ids) => vec![Effect::StartJobs { url_ids }],
            None => Vec::new(),
        },
        Msg::JobsStarted(started) => jobs_started(&mut state, started),
        Msg::JobsStartFailed(reason) => {
            state.set_busy(false);
            state.set_notice(Notice::new(
                NoticeKind::ActionFailure,
                format!("Failed to start jobs: {reason}"),
            ));
            Vec::new()
        }
        Msg::StopSelectedClicked => match begin_batch(&mut state) {
            Some(url_ids) => vec![Effect::StopJobs { url_ids }],
            None => Vec::new(),
        },
        Msg::JobsStopped(url_ids) => {
            state.set_busy(false);
            state.selection.clear();
            state.set_notice(Notice::new(
                NoticeKind::Info,
                format!("Stop requested for {} URL(s)", url_ids.len()),
            ));
            vec![state.request_page()]
        }
        Msg::JobsStopFailed(reason) => {
            state.set_busy(false);
            state.set_notice(Notice::new(
                NoticeKind::ActionFailure,
                format!("Failed to stop jobs: {reason}"),
            ));
            Vec::new()
        }
        Msg::PollTick => poll_tick(&mut state),
        Msg::JobStatusReceived {
            url_id,
            job_id,
            status,
            error,
        } => status_received(&mut state, url_id, job_id, status, error),
        Msg::JobStatusFailed { url_id, job_id } => {
            engine_debug!("Status poll failed url_id={} job_id={}", url_id, job_id);
            Vec::new()
        }
        Msg::ResultReceived { url_id, result } => result_received(&mut state, url_id, result),
        Msg::ResultUnavailable { url_id } => {
            engine_debug!("No result yet for url_id={}", url_id);
            Vec::new()
        }
    };

    (state, effects)
}

fn login(state: &mut AppState, username: String, password: String) -> Vec<Effect> {
    if state.session() != SessionState::SignedOut {
        return Vec::new();
    }
    let username = username.trim().to_string();
    if username.is_empty() || password.is_empty() {
        state.set_notice(Notice::new(
            NoticeKind::AuthFailure,
            "Username and password are required",
        ));
        return Vec::new();
    }
    state.set_session(SessionState::SigningIn);
    state.clear_notice();
    vec![Effect::Login { username, password }]
}

fn submit_url(state: &mut AppState, raw: &str) -> Vec<Effect> {
    let candidate = raw.trim();
    match url::Url::parse(candidate) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            vec![Effect::CreateUrl {
                url: candidate.to_string(),
            }]
        }
        _ => {
            state.set_notice(Notice::new(
                NoticeKind::ActionFailure,
                format!("Not a valid http(s) URL: {candidate:?}"),
            ));
            Vec::new()
        }
    }
}

fn go_to_page(state: &mut AppState, page: i64) -> Vec<Effect> {
    if state.registry.go_to(page) {
        vec![state.request_page()]
    } else {
        Vec::new()
    }
}

fn page_loaded(
    state: &mut AppState,
    page: u32,
    limit: u32,
    items: Vec<crate::UrlItem>,
    total: u64,
) -> Vec<Effect> {
    state.finish_load();
    state.clear_notice_of(NoticeKind::LoadFailure);
    state.registry.replace_page(page, limit, items, total);

    let ids = state.registry.ids();
    state.selection.retain_page(&ids);

    // Rows come back bare; keep showing which job each one is tied to.
    for (url_id, job_id) in state.jobs.entries() {
        state.registry.upsert_row(
            url_id,
            RowPatch {
                job_id: Some(job_id),
                ..RowPatch::default()
            },
        );
    }

    ids.into_iter()
        .map(|url_id| Effect::FetchResult { url_id })
        .collect()
}

/// Snapshot of the selection for a batch action, or `None` if nothing can start.
fn begin_batch(state: &mut AppState) -> Option<Vec<UrlId>> {
    if state.is_busy() || state.selection.is_empty() {
        return None;
    }
    state.set_busy(true);
    state.clear_notice();
    Some(state.selection.snapshot())
}

fn jobs_started(state: &mut AppState, started: Vec<StartedJob>) -> Vec<Effect> {
    state.set_busy(false);
    for StartedJob { url_id, job_id } in &started {
        if let Some(previous) = state.jobs.track(*url_id, *job_id) {
            engine_debug!("url_id={} job {} replaces {}", url_id, job_id, previous);
        }
        state.registry.upsert_row(*url_id, RowPatch::queued(*job_id));
    }
    state.selection.clear();
    state.set_notice(Notice::new(
        NoticeKind::Info,
        format!("Started {} job(s)", started.len()),
    ));
    state.ensure_poller().into_iter().collect()
}

fn poll_tick(state: &mut AppState) -> Vec<Effect> {
    let tick = state.next_poll_tick();
    engine_debug!("Poll tick {} over {} job(s)", tick, state.jobs.len());
    state
        .jobs
        .entries()
        .into_iter()
        .map(|(url_id, job_id)| Effect::FetchJobStatus { url_id, job_id })
        .collect()
}

fn status_received(
    state: &mut AppState,
    url_id: UrlId,
    job_id: JobId,
    status: JobStatus,
    error: Option<String>,
) -> Vec<Effect> {
    if !state.jobs.is_current(url_id, job_id) {
        engine_debug!(
            "Ignoring status {} for superseded job {} (url_id={})",
            status,
            job_id,
            url_id
        );
        return Vec::new();
    }

    let on_page = state.registry.upsert_row(
        url_id,
        RowPatch {
            job_id: Some(job_id),
            status: Some(status),
            job_error: error,
            result: None,
        },
    );
    if on_page {
        state.mark_dirty();
    }

    match status {
        // Stays tracked until the result is merged, so a failed fetch retries next tick.
        JobStatus::Completed if on_page => vec![Effect::FetchResult { url_id }],
        // Off-page rows pick up their result from the next page load instead.
        JobStatus::Completed | JobStatus::Failed | JobStatus::Stopped => {
            state.jobs.untrack(url_id, job_id);
            engine_info!("Job {} for url_id={} ended as {}", job_id, url_id, status);
            state.release_poller().into_iter().collect()
        }
        JobStatus::Queued | JobStatus::Running => Vec::new(),
    }
}

fn result_received(state: &mut AppState, url_id: UrlId, result: AnalysisResult) -> Vec<Effect> {
    if state.registry.upsert_row(url_id, RowPatch::result(result)) {
        state.mark_dirty();
    }

    let completed = state
        .registry
        .row(url_id)
        .is_some_and(|row| row.status == Some(JobStatus::Completed));
    match state.jobs.job_for(url_id) {
        Some(job_id) if completed => {
            state.jobs.untrack(url_id, job_id);
            engine_info!("Job {} for url_id={} completed", job_id, url_id);
            state.release_poller().into_iter().collect()
        }
        _ => Vec::new(),
    }
}
