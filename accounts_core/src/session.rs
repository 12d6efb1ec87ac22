use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use thiserror::Error;

/// The key the auth token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Things that can go wrong while reading or writing the session.
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't read or write the session file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The session file wasn't valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the auth token lives between runs. Pages only ever talk to this
/// trait, so tests can swap in a `MemorySession`.
pub trait Session: Send + Sync {
    /// The stored token, if there is one.
    fn token(&self) -> Option<String>;

    /// Store a new token, replacing any previous one.
    ///
    /// ## Errors
    ///
    /// Implementations may fail to persist the token.
    fn set_token(&self, token: &str) -> Result<()>;

    /// Forget every stored entry (not just the token.)
    ///
    /// ## Errors
    ///
    /// Implementations may fail to remove persisted state.
    fn clear(&self) -> Result<()>;
}

/// The persisted shape: a flat map of string entries.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct Entries(BTreeMap<String, String>);

/// A session kept in a JSON file, e.g. `session.json` in the data directory.
#[derive(Debug)]
pub struct FileSession {
    /// Where the entries are stored. A missing file means an empty session.
    path: PathBuf,

    /// Serializes writes from the UI and effect tasks.
    lock: Mutex<()>,
}

impl FileSession {
    /// Construct a session backed by the file at `path`. Nothing is read or
    /// written until the session is used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The file this session is stored in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Entries> {
        match fs::read(&self.path) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Entries::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, entries: &Entries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec(entries)?;
        fs::write(&self.path, data)?;

        Ok(())
    }
}

impl Session for FileSession {
    fn token(&self) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match self.read() {
            Ok(Entries(mut entries)) => entries.remove(TOKEN_KEY),
            Err(err) => {
                tracing::warn!(?err, path = ?self.path, "could not read session, treating as logged out");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // A corrupt file shouldn't keep someone from logging in again.
        let mut entries = self.read().unwrap_or_default();
        entries.0.insert(TOKEN_KEY.to_string(), token.to_string());

        self.write(&entries)?;
        tracing::info!(path = ?self.path, "stored session token");

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        tracing::info!(path = ?self.path, "cleared session");

        Ok(())
    }
}

/// A session that only lives as long as the process. Useful in tests.
#[derive(Debug, Default)]
pub struct MemorySession {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySession {
    /// An empty (logged-out) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that already holds `token`.
    pub fn with_token(token: &str) -> Self {
        let session = Self::new();
        session
            .lock()
            .insert(TOKEN_KEY.to_string(), token.to_string());
        session
    }

    /// Store an arbitrary entry, alongside the token.
    pub fn insert(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    /// Is the session completely empty?
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Session for MemorySession {
    fn token(&self) -> Option<String> {
        self.lock().get(TOKEN_KEY).cloned()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        self.lock().insert(TOKEN_KEY.to_string(), token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock().clear();
        Ok(())
    }
}
