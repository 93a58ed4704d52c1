use std::sync::Arc;

use anyhow::Context;
use crawlwatch_core::{update, AppState, Msg};
use crawlwatch_engine::{
    EngineEvent, EngineHandle, FileSession, Gateway, GatewaySettings, ReqwestGateway,
    SessionProvider,
};
use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::sync::mpsc;

use super::effects::{map_event, EffectRunner};
use super::logging;
use super::ui::input::{self, Command};
use super::ui::render;
use crate::args::Args;

pub fn run_app(args: Args) -> anyhow::Result<()> {
    logging::initialize(args.log, &args.log_file, args.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let session: Arc<dyn SessionProvider> = Arc::new(FileSession::open(&args.session_file));
    let settings = GatewaySettings {
        base_url: args.api_url.clone(),
        request_timeout: args.request_timeout(),
        ..GatewaySettings::default()
    };
    let gateway = ReqwestGateway::new(settings, session.clone())
        .with_context(|| format!("invalid service url {}", args.api_url))?;
    engine_info!("Using crawl service at {}", gateway.base_url());
    if let Err(err) = gateway.health().await {
        engine_warn!("Crawl service at {} is not healthy: {}", gateway.base_url(), err);
        println!("Warning: {} did not answer its health check ({err})", gateway.base_url());
    }

    let (engine, events) = EngineHandle::new(Arc::new(gateway), session, args.poll_interval());
    let mut app = App::new(AppState::with_page_size(args.page_size), EffectRunner::new(engine));

    println!("{}", input::HELP);
    app.start();
    app.event_loop(events, input::spawn_reader()).await;
    app.shutdown();
    Ok(())
}

/// Owns the single state record and applies messages to it one at a time.
struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    fn start(&mut self) {
        self.render();
        if self.runner.has_session() {
            engine_info!("Restoring stored session");
            self.dispatch(Msg::SessionRestored);
        }
    }

    async fn event_loop(
        &mut self,
        mut events: mpsc::UnboundedReceiver<EngineEvent>,
        mut lines: mpsc::UnboundedReceiver<String>,
    ) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.dispatch(map_event(event)),
                    None => break,
                },
                line = lines.recv() => {
                    let Some(line) = line else {
                        engine_debug!("Input closed");
                        break;
                    };
                    match input::parse(&line) {
                        Ok(Some(Command::Send(msgs))) => {
                            for msg in msgs {
                                self.dispatch(msg);
                            }
                        }
                        Ok(Some(Command::Help)) => println!("{}", input::HELP),
                        Ok(Some(Command::Quit)) => break,
                        Ok(None) => {}
                        Err(err) => println!("{err}"),
                    }
                }
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        match poll_tick_of(&msg, &self.state) {
            Some(tick) => engine_logging::with_poll_tick(tick, || self.apply(msg)),
            None => self.apply(msg),
        }
    }

    fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
        if self.state.consume_dirty() {
            self.render();
        }
    }

    fn render(&self) {
        print!("{}", render::render(&self.state.view()));
    }

    fn shutdown(&mut self) {
        self.dispatch(Msg::Shutdown);
        self.runner.shutdown();
        engine_info!("Exiting");
    }
}

/// Tick number a `PollTick` is about to become; other messages log untagged.
fn poll_tick_of(msg: &Msg, state: &AppState) -> Option<u64> {
    match msg {
        Msg::PollTick => Some(state.poll_ticks() + 1),
        _ => None,
    }
}
