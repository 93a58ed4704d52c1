mod app;
mod effects;
pub(crate) mod logging;
mod ui;

pub(crate) use app::run_app;
