//! TOML-backed implementation of the [`SnapshotStore`] port.
//!
//! The whole snapshot lives in one `state.toml` file. Writes go through
//! a temp file in the same directory, fsync, then an atomic rename, so
//! a crash never leaves a half-written state file. Loads are tolerant:
//! a corrupt file is logged and treated as empty rather than blocking
//! the application from starting.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use lcdesk_core::error::{Error, Result};
use lcdesk_core::session::Session;
use lcdesk_core::snapshot::{RECENT_SESSIONS_LIMIT, SnapshotStore};

/// On-disk shape of the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    saved_at: String,
    #[serde(default)]
    current_session: Option<Session>,
    #[serde(default)]
    recent_sessions: Vec<Session>,
}

/// Snapshot store persisting to a single TOML file.
pub struct TomlSnapshotStore {
    path: PathBuf,
}

impl TomlSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store at the default location under the LCDesk home.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::paths::state_file()?))
    }

    fn load(&self) -> StateFile {
        if !self.path.exists() {
            return StateFile::default();
        }
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                warn!(
                    "[SnapshotStore] could not read {}: {}; starting empty",
                    self.path.display(),
                    err
                );
                return StateFile::default();
            }
        };
        match toml::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    "[SnapshotStore] corrupt state file {}: {}; starting empty",
                    self.path.display(),
                    err
                );
                StateFile::default()
            }
        }
    }

    fn save(&self, state: &mut StateFile) -> Result<()> {
        state.saved_at = chrono::Utc::now().to_rfc3339();
        let content = toml::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // temp file + fsync + rename keeps the write atomic
        let tmp_path = temp_path(&self.path)?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);
        fs::rename(&tmp_path, &self.path)?;

        debug!("[SnapshotStore] saved {}", self.path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::config("state file path has no parent directory"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::config("state file path has no file name"))?;
    Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
}

#[async_trait]
impl SnapshotStore for TomlSnapshotStore {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.load().current_session)
    }

    async fn set_current_session(&self, session: &Session) -> Result<()> {
        let mut state = self.load();
        state
            .recent_sessions
            .retain(|recent| recent.id != session.id);
        state.recent_sessions.insert(0, session.clone());
        state.recent_sessions.truncate(RECENT_SESSIONS_LIMIT);
        state.current_session = Some(session.clone());
        self.save(&mut state)
    }

    async fn clear_current_session(&self) -> Result<()> {
        let mut state = self.load();
        state.current_session = None;
        self.save(&mut state)
    }

    async fn recent_sessions(&self) -> Result<Vec<Session>> {
        Ok(self.load().recent_sessions)
    }

    async fn remove_session(&self, session_id: &str) -> Result<()> {
        let mut state = self.load();
        state.recent_sessions.retain(|s| s.id != session_id);
        if state
            .current_session
            .as_ref()
            .is_some_and(|s| s.id == session_id)
        {
            state.current_session = None;
        }
        self.save(&mut state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcdesk_core::session::SessionStatus;
    use tempfile::TempDir;

    fn session(id: &str) -> Session {
        Session {
            id: id.to_string(),
            cif_number: "CIF-1".into(),
            lc_number: "LC-1".into(),
            instrument: Some("LC".into()),
            lifecycle: "Issuance".into(),
            account_name: None,
            customer_name: "Acme Trading".into(),
            customer_type: "Corporate".into(),
            customer_id: None,
            status: SessionStatus::Created,
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    fn store(dir: &TempDir) -> TomlSnapshotStore {
        TomlSnapshotStore::new(dir.path().join("state.toml"))
    }

    #[tokio::test]
    async fn current_session_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.current_session().await.unwrap().is_none());

        store.set_current_session(&session("s1")).await.unwrap();
        let loaded = store.current_session().await.unwrap().unwrap();
        assert_eq!(loaded.id, "s1");
        assert_eq!(loaded.customer_name, "Acme Trading");

        store.clear_current_session().await.unwrap();
        assert!(store.current_session().await.unwrap().is_none());
        // clearing the current selection keeps the recent list
        assert_eq!(store.recent_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn recent_list_dedupes_and_stays_bounded() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        for i in 0..8 {
            store
                .set_current_session(&session(&format!("s{i}")))
                .await
                .unwrap();
        }
        // revisit an old one: it moves to the front, no duplicate
        store.set_current_session(&session("s5")).await.unwrap();

        let recent = store.recent_sessions().await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s5", "s7", "s6", "s4", "s3"]);
        assert_eq!(recent.len(), RECENT_SESSIONS_LIMIT);
    }

    #[tokio::test]
    async fn remove_session_drops_current_and_recent_entries() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.set_current_session(&session("s1")).await.unwrap();
        store.set_current_session(&session("s2")).await.unwrap();

        store.remove_session("s2").await.unwrap();
        assert!(store.current_session().await.unwrap().is_none());
        let recent = store.recent_sessions().await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "s1");

        // removing a non-current session leaves the current one alone
        store.set_current_session(&session("s3")).await.unwrap();
        store.remove_session("s1").await.unwrap();
        assert_eq!(store.current_session().await.unwrap().unwrap().id, "s3");
    }

    #[tokio::test]
    async fn corrupt_state_file_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "this is [not valid toml").unwrap();

        let store = TomlSnapshotStore::new(&path);
        assert!(store.current_session().await.unwrap().is_none());
        assert!(store.recent_sessions().await.unwrap().is_empty());

        // and the next write repairs the file
        store.set_current_session(&session("s1")).await.unwrap();
        assert_eq!(store.current_session().await.unwrap().unwrap().id, "s1");
    }

    #[tokio::test]
    async fn no_temp_file_is_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.set_current_session(&session("s1")).await.unwrap();
        assert!(!dir.path().join(".state.toml.tmp").exists());
        assert!(dir.path().join("state.toml").exists());
    }
}
