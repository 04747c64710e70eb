//! Where the signed-in user survives a restart
//!
//! The record is a JSON object with a single `user` key holding the
//! serialized [`User`].

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::models::User;

/// File name of the session record inside the data directory
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    user: User,
}

/// Storage for the current user record
pub trait SessionPersistence: Send + Sync {
    /// Load the stored user, if any. Corrupt records are an error.
    fn load(&self) -> Result<Option<User>>;

    /// Store the user, replacing any previous record
    fn save(&self, user: &User) -> Result<()>;

    /// Remove the record
    fn clear(&self) -> Result<()>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Session file inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionPersistence for FileSession {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<User>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let record: SessionRecord = serde_json::from_str(&content)?;
        Ok(Some(record.user))
    }

    #[instrument(skip(self, user), fields(path = %self.path.display(), user_id = %user.id))]
    fn save(&self, user: &User) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&SessionRecord { user: user.clone() })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process record, serialized the same way as the file
#[derive(Debug, Default)]
pub struct MemorySession {
    slot: Mutex<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw record content, e.g. to simulate a corrupt record
    pub fn with_raw(content: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(content.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionPersistence for MemorySession {
    fn load(&self) -> Result<Option<User>> {
        match self.slot().as_deref() {
            Some(content) => {
                let record: SessionRecord = serde_json::from_str(content)?;
                Ok(Some(record.user))
            }
            None => Ok(None),
        }
    }

    fn save(&self, user: &User) -> Result<()> {
        let content = serde_json::to_string(&SessionRecord { user: user.clone() })?;
        *self.slot() = Some(content);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}
