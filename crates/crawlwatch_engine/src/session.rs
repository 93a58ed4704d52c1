use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use engine_logging::{engine_info, engine_warn};

use crate::persist::{read_optional, AtomicFileWriter, PersistError};

/// Key of the token inside the durable session slot.
pub const TOKEN_KEY: &str = "auth_token";

/// Holder of the optional bearer token read by every authenticated request.
pub trait SessionProvider: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// Token slot that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionProvider for MemorySession {
    fn get(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, token: &str) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

/// Durable key-value slot stored as a RON map; the token lives under [`TOKEN_KEY`].
///
/// Other keys found in the file are preserved on write. A slot that cannot be
/// read or parsed behaves as "no token".
#[derive(Debug)]
pub struct FileSession {
    writer: AtomicFileWriter,
    slots: RwLock<BTreeMap<String, String>>,
}

impl FileSession {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = match load_slots(&path) {
            Ok(slots) => slots,
            Err(err) => {
                engine_warn!("Ignoring unreadable session file {:?}: {}", path, err);
                BTreeMap::new()
            }
        };
        Self {
            writer: AtomicFileWriter::new(path),
            slots: RwLock::new(slots),
        }
    }

    fn save(&self, slots: &BTreeMap<String, String>) {
        let content = match ron::ser::to_string_pretty(slots, ron::ser::PrettyConfig::new()) {
            Ok(text) => text,
            Err(err) => {
                engine_warn!("Failed to serialize session: {}", err);
                return;
            }
        };
        if let Err(err) = self.writer.write(&content) {
            engine_warn!(
                "Failed to write session to {:?}: {}",
                self.writer.target(),
                err
            );
        }
    }
}

fn load_slots(path: &std::path::Path) -> Result<BTreeMap<String, String>, PersistError> {
    match read_optional(path)? {
        Some(text) => ron::from_str(&text).map_err(|err| PersistError::Malformed {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        None => Ok(BTreeMap::new()),
    }
}

impl SessionProvider for FileSession {
    fn get(&self) -> Option<String> {
        self.slots
            .read()
            .ok()
            .and_then(|slots| slots.get(TOKEN_KEY).cloned())
    }

    fn set(&self, token: &str) {
        let Ok(mut slots) = self.slots.write() else {
            return;
        };
        slots.insert(TOKEN_KEY.to_string(), token.to_string());
        self.save(&slots);
        engine_info!("Session token stored in {:?}", self.writer.target());
    }

    fn clear(&self) {
        let Ok(mut slots) = self.slots.write() else {
            return;
        };
        if slots.remove(TOKEN_KEY).is_some() {
            self.save(&slots);
            engine_info!("Session token cleared");
        }
    }
}
