use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crawlwatch_core::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crawlwatch_engine::DEFAULT_BASE_URL;

use crate::platform::logging::LogDestination;

/// Terminal client for the crawl service: add URLs, start and stop crawl
/// jobs, and watch their results arrive.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Base URL of the crawl service
    #[arg(long, env = "CRAWLWATCH_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Rows per page of the URL listing
    #[arg(
        long,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE))
    )]
    pub page_size: u32,

    /// Milliseconds between job status polls
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: u64,

    /// File holding the session token between runs
    #[arg(long, default_value = ".crawlwatch_session.ron")]
    pub session_file: PathBuf,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(long, default_value = "./crawlwatch.log")]
    pub log_file: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
