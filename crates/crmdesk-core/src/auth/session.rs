use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// The current user's credential and display name.
///
/// Either field may be absent. Without a credential the user is logged out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    #[serde(rename = "userName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(credential: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
            display_name: Some(display_name.into()),
        }
    }

    /// Get the bearer token if one is stored
    pub fn token(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.credential.is_none() && self.display_name.is_none()
    }
}

/// Durable storage for the one session of this user profile.
///
/// Last write wins. Nothing is synchronized between processes sharing the
/// same backend.
pub trait SessionStore: Send + Sync {
    /// Persist both values, replacing any previous session
    fn save(&self, credential: &str, display_name: &str) -> Result<()>;

    /// The persisted session, or an empty one
    fn current(&self) -> Session;

    /// Remove both values. Clearing an empty store is a no-op.
    fn clear(&self) -> Result<()>;
}

/// Session persisted as JSON in the data directory
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn load(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let session: Session =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(session))
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, credential: &str, display_name: &str) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let contents = serde_json::to_string_pretty(&Session::new(credential, display_name))?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        debug!(path = %path.display(), "Session saved");
        Ok(())
    }

    fn current(&self) -> Session {
        match self.load() {
            Ok(session) => session.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session file");
                Session::default()
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove session file")?;
            debug!(path = %path.display(), "Session cleared");
        }
        Ok(())
    }
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(credential: &str, display_name: &str) -> Self {
        Self {
            session: Mutex::new(Session::new(credential, display_name)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, credential: &str, display_name: &str) -> Result<()> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *session = Session::new(credential, display_name);
        Ok(())
    }

    fn current(&self) -> Session {
        self.session
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn clear(&self) -> Result<()> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *session = Session::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(store: &dyn SessionStore) {
        assert_eq!(store.current(), Session::default());

        store.save("tok-1", "Ana").unwrap();
        assert_eq!(store.current(), Session::new("tok-1", "Ana"));

        // Overwrites the previous session
        store.save("tok-2", "Luis").unwrap();
        assert_eq!(store.current().token(), Some("tok-2"));
        assert_eq!(store.current().display_name.as_deref(), Some("Luis"));

        store.clear().unwrap();
        assert!(store.current().is_empty());

        // Idempotent
        store.clear().unwrap();
        assert_eq!(store.current(), Session::default());
    }

    #[test]
    fn test_memory_store_round_trip() {
        round_trip(&MemorySessionStore::new());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        round_trip(&FileSessionStore::new(dir.path().join("crmdesk")));
    }

    #[test]
    fn test_file_store_visible_to_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileSessionStore::new(dir.path().to_path_buf())
            .save("abc", "Ana")
            .unwrap();

        let reopened = FileSessionStore::new(dir.path().to_path_buf());
        assert_eq!(reopened.current(), Session::new("abc", "Ana"));
    }

    #[test]
    fn test_file_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf());
        store.save("abc", "Ana").unwrap();

        let raw = std::fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["authToken"], "abc");
        assert_eq!(value["userName"], "Ana");
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();

        let store = FileSessionStore::new(dir.path().to_path_buf());
        assert!(store.current().is_empty());
        store.clear().unwrap();
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn test_token_without_name() {
        let session: Session = serde_json::from_str(r#"{"authToken":"t"}"#).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.display_name, None);
    }
}
