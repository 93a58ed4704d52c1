use crawlwatch_core::{Effect, Msg};
use crawlwatch_engine::{EngineEvent, EngineHandle, GatewayError};
use engine_logging::{engine_debug, engine_info, engine_warn};

/// Executes effects produced by `update` against the engine.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn has_session(&self) -> bool {
        self.engine.has_session()
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Login { username, password } => {
                    engine_info!("Login username={}", username);
                    self.engine.login(username, password);
                }
                Effect::ClearSession => self.engine.clear_session(),
                Effect::LoadPage { request_id, query } => {
                    engine_debug!(
                        "LoadPage request_id={} page={} limit={} sort={:?} {}",
                        request_id,
                        query.page,
                        query.limit,
                        query.sort_field,
                        query.sort_order.as_query()
                    );
                    self.engine.load_page(request_id, query);
                }
                Effect::CreateUrl { url } => {
                    engine_info!("CreateUrl url={}", url);
                    self.engine.create_url(url);
                }
                Effect::StartJobs { url_ids } => {
                    engine_info!("StartJobs url_ids={:?}", url_ids);
                    self.engine.start_jobs(url_ids);
                }
                Effect::StopJobs { url_ids } => {
                    engine_info!("StopJobs url_ids={:?}", url_ids);
                    self.engine.stop_jobs(url_ids);
                }
                Effect::FetchJobStatus { url_id, job_id } => {
                    self.engine.job_status(url_id, job_id);
                }
                Effect::FetchResult { url_id } => self.engine.fetch_result(url_id),
                Effect::StartPoller => self.engine.start_polling(),
                Effect::StopPoller => self.engine.stop_polling(),
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

/// Translates an engine outcome into the message `update` understands.
pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::LoggedIn(Ok(())) => Msg::LoginSucceeded,
        EngineEvent::LoggedIn(Err(err)) => {
            engine_warn!("Login failed: {}", err);
            Msg::LoginFailed(describe(&err))
        }
        EngineEvent::PageListed { request_id, result } => match result {
            Ok(page) => Msg::PageLoaded {
                request_id,
                page: page.page,
                limit: page.limit,
                items: page.data,
                total: page.total,
            },
            Err(err) => {
                engine_warn!("Listing request {} failed: {}", request_id, err);
                Msg::PageLoadFailed {
                    request_id,
                    error: describe(&err),
                }
            }
        },
        EngineEvent::UrlCreated(Ok(item)) => Msg::UrlCreated(item),
        EngineEvent::UrlCreated(Err(err)) => Msg::UrlCreateFailed(describe(&err)),
        EngineEvent::JobsStarted(Ok(started)) => Msg::JobsStarted(started),
        EngineEvent::JobsStarted(Err(err)) => Msg::JobsStartFailed(describe(&err)),
        EngineEvent::JobsStopped { url_ids, result } => match result {
            Ok(()) => Msg::JobsStopped(url_ids),
            Err(err) => Msg::JobsStopFailed(describe(&err)),
        },
        EngineEvent::JobStatus {
            url_id,
            job_id,
            result,
        } => match result {
            Ok(state) => Msg::JobStatusReceived {
                url_id,
                job_id,
                status: state.status,
                error: state.error,
            },
            Err(err) => {
                // Poll failures stay out of the view; the next tick retries.
                engine_debug!("Status poll for job {} failed: {}", job_id, err);
                Msg::JobStatusFailed { url_id, job_id }
            }
        },
        EngineEvent::ResultFetched { url_id, result } => match result {
            Ok(result) => Msg::ResultReceived { url_id, result },
            Err(err) => {
                if !err.is_not_found() {
                    engine_debug!("Result fetch for url {} failed: {}", url_id, err);
                }
                Msg::ResultUnavailable { url_id }
            }
        },
        EngineEvent::PollTick => Msg::PollTick,
    }
}

fn describe(err: &GatewayError) -> String {
    match err {
        GatewayError::Unauthorized => "not authorized".to_string(),
        GatewayError::HttpStatus(status) => format!("server responded with {status}"),
        GatewayError::Timeout => "request timed out".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawlwatch_core::{AnalysisResult, JobStatus, StartedJob, UrlItem};
    use crawlwatch_engine::{JobState, UrlPage};
    use pretty_assertions::assert_eq;

    #[test]
    fn page_listing_keeps_request_id() {
        let msg = map_event(EngineEvent::PageListed {
            request_id: 4,
            result: Ok(UrlPage {
                data: vec![UrlItem::new(1, "https://a.example")],
                total: 21,
                page: 2,
                limit: 20,
            }),
        });
        assert_eq!(
            msg,
            Msg::PageLoaded {
                request_id: 4,
                page: 2,
                limit: 20,
                items: vec![UrlItem::new(1, "https://a.example")],
                total: 21,
            }
        );

        let msg = map_event(EngineEvent::PageListed {
            request_id: 5,
            result: Err(GatewayError::HttpStatus(502)),
        });
        assert_eq!(
            msg,
            Msg::PageLoadFailed {
                request_id: 5,
                error: "server responded with 502".to_string(),
            }
        );
    }

    #[test]
    fn rejected_login_reads_as_auth_failure() {
        assert_eq!(
            map_event(EngineEvent::LoggedIn(Err(GatewayError::Unauthorized))),
            Msg::LoginFailed("not authorized".to_string())
        );
        assert_eq!(
            map_event(EngineEvent::LoggedIn(Ok(()))),
            Msg::LoginSucceeded
        );
    }

    #[test]
    fn job_outcomes_map_to_messages() {
        let started = vec![StartedJob {
            url_id: 1,
            job_id: 10,
        }];
        assert_eq!(
            map_event(EngineEvent::JobsStarted(Ok(started.clone()))),
            Msg::JobsStarted(started)
        );
        assert_eq!(
            map_event(EngineEvent::JobsStopped {
                url_ids: vec![2, 3],
                result: Ok(()),
            }),
            Msg::JobsStopped(vec![2, 3])
        );
        assert_eq!(
            map_event(EngineEvent::JobsStopped {
                url_ids: vec![2],
                result: Err(GatewayError::Timeout),
            }),
            Msg::JobsStopFailed("request timed out".to_string())
        );
    }

    #[test]
    fn status_carries_job_identity() {
        let msg = map_event(EngineEvent::JobStatus {
            url_id: 1,
            job_id: 10,
            result: Ok(JobState {
                id: 10,
                status: JobStatus::Failed,
                error: Some("dns".to_string()),
            }),
        });
        assert_eq!(
            msg,
            Msg::JobStatusReceived {
                url_id: 1,
                job_id: 10,
                status: JobStatus::Failed,
                error: Some("dns".to_string()),
            }
        );

        let msg = map_event(EngineEvent::JobStatus {
            url_id: 1,
            job_id: 10,
            result: Err(GatewayError::Network("reset".to_string())),
        });
        assert_eq!(msg, Msg::JobStatusFailed { url_id: 1, job_id: 10 });
    }

    #[test]
    fn missing_or_failed_results_are_unavailable() {
        assert_eq!(
            map_event(EngineEvent::ResultFetched {
                url_id: 3,
                result: Err(GatewayError::NotFound),
            }),
            Msg::ResultUnavailable { url_id: 3 }
        );
        assert_eq!(
            map_event(EngineEvent::ResultFetched {
                url_id: 3,
                result: Err(GatewayError::HttpStatus(500)),
            }),
            Msg::ResultUnavailable { url_id: 3 }
        );

        let result = AnalysisResult {
            url_id: 3,
            title: Some("Home".to_string()),
            ..AnalysisResult::default()
        };
        assert_eq!(
            map_event(EngineEvent::ResultFetched {
                url_id: 3,
                result: Ok(result.clone()),
            }),
            Msg::ResultReceived { url_id: 3, result }
        );
    }
}
