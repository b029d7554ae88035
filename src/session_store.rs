//! Session persistence between runs.

use crate::error::{ProjectFlowError, Result};
use crate::model::Session;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage key the session is kept under. The file is `<key>.json`.
pub const SESSION_KEY: &str = "session";

/// Persists the signed-in session between runs.
///
/// The session is read once at start-up, written on login and removed on
/// logout. A file that cannot be parsed is treated as "no session" and
/// deleted.
pub struct SessionStore {
    base_dir: PathBuf,
}

impl SessionStore {
    /// Store under `~/.config/projectflow/`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            base_dir: crate::config::config_dir()?,
        })
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { base_dir: dir }
    }

    pub fn path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.json", SESSION_KEY))
    }

    pub fn load(&self) -> Result<Option<Session>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read(&path)?;
        match serde_json::from_slice::<Session>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!("discarding malformed session file {:?}: {}", path, e);
                discard(&path)?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.base_dir).map_err(|e| ProjectFlowError::SessionStore {
            path: self.base_dir.clone(),
            message: e.to_string(),
        })?;
        let content = serde_json::to_string_pretty(session)?;
        fs::write(self.path(), content)?;
        log::info!("session saved for {}", session.email);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path)?;
            log::info!("session cleared");
        }
        Ok(())
    }
}

fn discard(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use tempfile::TempDir;

    fn session() -> Session {
        Session {
            user_id: "2".to_string(),
            display_name: "Project Manager".to_string(),
            email: "manager@projectflow.com".to_string(),
            role: Role::Manager,
        }
    }

    #[test]
    fn test_load_returns_none_when_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().join("nested"));
        store.save(&session()).unwrap();
        assert!(store.path().ends_with("session.json"));
        assert_eq!(store.load().unwrap(), Some(session()));
    }

    #[test]
    fn test_clear_removes_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        store.save(&session()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_malformed_session_is_discarded() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(!store.path().exists(), "malformed file should be removed");
    }

    #[test]
    fn test_session_that_is_not_utf8_is_discarded() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        fs::write(store.path(), [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        assert!(matches!(store.load(), Ok(None)));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_session_with_unknown_role_is_discarded() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        fs::write(
            store.path(),
            r#"{"user_id":"1","display_name":"X","email":"x@y.z","role":"owner"}"#,
        )
        .unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
