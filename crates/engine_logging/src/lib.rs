#![deny(missing_docs)]
//! Shared logging utilities for the crawlwatch workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Messages emitted
//! while a poll tick is being processed are prefixed with the tick number so
//! interleaved status responses can be told apart in the log.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Poll tick currently being processed on this thread (0 = none).
    static POLL_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Records the poll tick being processed by the current thread.
/// Prefer [`with_poll_tick`], which restores the previous tick afterwards.
pub fn set_poll_tick(tick: u64) {
    POLL_TICK.with(|v| v.set(tick));
}

/// Runs `f` with `tick` recorded as the current poll tick, then restores the previous one.
pub fn with_poll_tick<R>(tick: u64, f: impl FnOnce() -> R) -> R {
    let previous = current_poll_tick();
    set_poll_tick(tick);
    let out = f();
    set_poll_tick(previous);
    out
}

/// Returns the last poll tick recorded on this thread, or 0 if none.
pub fn current_poll_tick() -> u64 {
    POLL_TICK.with(|v| v.get())
}

/// Prefix attached to every `engine_*` message.
#[doc(hidden)]
pub fn tick_prefix() -> String {
    match current_poll_tick() {
        0 => String::new(),
        tick => format!("[tick {tick}] "),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
