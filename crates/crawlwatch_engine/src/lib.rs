//! Crawlwatch engine: gateway IO, session storage and the polling task.
mod engine;
mod gateway;
mod persist;
mod poller;
mod session;
mod types;

pub use engine::EngineHandle;
pub use gateway::{Gateway, GatewaySettings, ReqwestGateway, DEFAULT_BASE_URL};
pub use persist::{ensure_state_dir, read_optional, AtomicFileWriter, PersistError};
pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use session::{FileSession, MemorySession, SessionProvider, TOKEN_KEY};
pub use types::{EngineEvent, GatewayError, JobState, UrlPage};
