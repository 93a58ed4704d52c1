use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crawlwatch_core::{JobId, PageQuery, UrlId};
use engine_logging::engine_info;
use tokio::sync::mpsc;

use crate::gateway::Gateway;
use crate::poller::Poller;
use crate::session::SessionProvider;
use crate::EngineEvent;

/// Runs gateway calls as independent tasks and reports each outcome as an
/// [`EngineEvent`]. Calls are fire-and-forget: once the event receiver is
/// dropped, late outcomes are discarded.
///
/// All methods must be called from within a tokio runtime.
pub struct EngineHandle {
    gateway: Arc<dyn Gateway>,
    session: Arc<dyn SessionProvider>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    poller: Poller,
}

impl EngineHandle {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        session: Arc<dyn SessionProvider>,
        poll_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handle = Self {
            gateway,
            session,
            event_tx,
            poller: Poller::new(poll_interval),
        };
        (handle, event_rx)
    }

    pub fn has_session(&self) -> bool {
        self.session.get().is_some()
    }

    pub fn clear_session(&self) {
        self.session.clear();
    }

    fn spawn<F, Fut>(&self, call: F)
    where
        F: FnOnce(Arc<dyn Gateway>) -> Fut,
        Fut: Future<Output = EngineEvent> + Send + 'static,
    {
        let event_tx = self.event_tx.clone();
        let fut = call(self.gateway.clone());
        tokio::spawn(async move {
            let event = fut.await;
            // Receiver gone means the view was torn down.
            let _ = event_tx.send(event);
        });
    }

    pub fn login(&self, username: String, password: String) {
        self.spawn(|gateway| async move {
            let result = gateway.login(&username, &password).await.map(|_| ());
            EngineEvent::LoggedIn(result)
        });
    }

    pub fn load_page(&self, request_id: u64, query: PageQuery) {
        self.spawn(move |gateway| async move {
            EngineEvent::PageListed {
                request_id,
                result: gateway.list_urls(&query).await,
            }
        });
    }

    pub fn create_url(&self, url: String) {
        self.spawn(|gateway| async move { EngineEvent::UrlCreated(gateway.create_url(&url).await) });
    }

    pub fn start_jobs(&self, url_ids: Vec<UrlId>) {
        self.spawn(|gateway| async move {
            EngineEvent::JobsStarted(gateway.start_jobs(&url_ids).await)
        });
    }

    pub fn stop_jobs(&self, url_ids: Vec<UrlId>) {
        self.spawn(|gateway| async move {
            let result = gateway.stop_jobs(&url_ids).await;
            EngineEvent::JobsStopped { url_ids, result }
        });
    }

    pub fn job_status(&self, url_id: UrlId, job_id: JobId) {
        self.spawn(move |gateway| async move {
            EngineEvent::JobStatus {
                url_id,
                job_id,
                result: gateway.job_status(job_id).await,
            }
        });
    }

    pub fn fetch_result(&self, url_id: UrlId) {
        self.spawn(move |gateway| async move {
            EngineEvent::ResultFetched {
                url_id,
                result: gateway.get_result(url_id).await,
            }
        });
    }

    pub fn start_polling(&mut self) {
        let event_tx = self.event_tx.clone();
        self.poller
            .start(move || event_tx.send(EngineEvent::PollTick).is_ok());
    }

    pub fn stop_polling(&mut self) {
        self.poller.stop();
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Cancels the poller; in-flight calls finish but their events go nowhere
    /// once the receiver is dropped.
    pub fn shutdown(&mut self) {
        self.poller.stop();
        engine_info!("Engine shut down");
    }
}
