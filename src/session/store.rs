//! Durable key/value storage for the session fields.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use tracing::warn;

use super::Credentials;
use crate::error::PortalError;
use crate::Result;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the role claim.
pub const ROLE_KEY: &str = "role";
/// Storage key of the username.
pub const USERNAME_KEY: &str = "username";

/// All keys that make up a persisted session.
pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, ROLE_KEY, USERNAME_KEY];

/// A string-keyed durable store.
///
/// Batch operations must be applied as a unit: either every entry lands or
/// none does.
pub trait StorageBackend: Send + Sync {
    /// Read a single entry.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several entries in one step.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several entries in one step. Missing keys are ignored.
    fn remove_all(&self, keys: &[&str]) -> Result<()>;
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PortalError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_all(&self, batch: &[(&str, &str)]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PortalError::LockPoisoned)?;

        for (key, value) in batch {
            entries.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PortalError::LockPoisoned)?;

        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

/// JSON-file storage.
///
/// The whole map is rewritten through a sibling temp file and renamed into
/// place, so a batch is never half-applied on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`load`](Self::load), but an unreadable file is replaced on the
    /// next write instead of blocking it.
    fn load_for_write(&self) -> Result<HashMap<String, String>> {
        match self.load() {
            Err(PortalError::Json(e)) => {
                warn!(path = %self.path.display(), error = %e, "overwriting corrupt session file");
                Ok(HashMap::new())
            }
            other => other,
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_all(&self, batch: &[(&str, &str)]) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PortalError::LockPoisoned)?;

        let mut entries = self.load_for_write()?;
        for (key, value) in batch {
            entries.insert((*key).to_string(), (*value).to_string());
        }
        self.save(&entries)
    }

    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PortalError::LockPoisoned)?;

        let mut entries = self.load_for_write()?;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }

        if entries.len() == before {
            return Ok(());
        }
        self.save(&entries)
    }
}

/// Raw session fields as found in storage, each possibly missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredFields {
    pub token: Option<String>,
    pub role: Option<String>,
    pub username: Option<String>,
}

impl StoredFields {
    /// True when at least one field is present but not all of them.
    pub fn is_partial(&self) -> bool {
        let present = [&self.token, &self.role, &self.username]
            .iter()
            .filter(|f| f.is_some())
            .count();
        present > 0 && present < 3
    }
}

/// Durable mirror of the session.
///
/// Reads are open to anyone; writes are crate-private and reserved for
/// [`SessionManager`](super::SessionManager).
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn StorageBackend>,
}

impl SessionStore {
    /// Wrap an arbitrary backend.
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryStorage::new()))
    }

    /// A store persisted to a JSON file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(Arc::new(FileStorage::new(path)))
    }

    /// Read a single raw entry.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.backend.get(key)
    }

    /// Read the three session fields.
    pub fn read_fields(&self) -> Result<StoredFields> {
        Ok(StoredFields {
            token: self.backend.get(TOKEN_KEY)?,
            role: self.backend.get(ROLE_KEY)?,
            username: self.backend.get(USERNAME_KEY)?,
        })
    }

    pub(crate) fn write_session(&self, credentials: &Credentials) -> Result<()> {
        self.backend.set_all(&[
            (TOKEN_KEY, credentials.token()),
            (ROLE_KEY, credentials.role().as_str()),
            (USERNAME_KEY, credentials.username()),
        ])
    }

    pub(crate) fn clear_session(&self) -> Result<()> {
        self.backend.remove_all(&SESSION_KEYS)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
