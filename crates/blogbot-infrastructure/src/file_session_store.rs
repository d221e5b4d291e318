//! File-backed session store.
//!
//! Fallback used when no shared cache is available (the original blog
//! fell back from memcached to a session file the same way). All
//! snapshots live in one JSON object keyed by user id; writes go
//! through a tmp file + atomic rename, serialized by an in-process
//! mutex.

use async_trait::async_trait;
use blogbot_core::error::Result;
use blogbot_core::session::SessionStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Session store keeping snapshots in a single JSON file.
///
/// No TTL: entries persist until overwritten or removed. Intended for
/// single-process deployments only.
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Store over the given file; the file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<HashMap<String, String>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_all(&self, entries: &HashMap<String, String>) -> Result<()> {
        let content = serde_json::to_string(entries)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(user_id))
    }

    async fn set(&self, user_id: &str, snapshot: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(user_id.to_string(), snapshot);
        self.write_all(&entries).await
    }

    async fn remove(&self, user_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(user_id).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions.json"));
        assert_eq!(store.get("u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshots_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let store = FileSessionStore::new(&path);
        store.set("u1", "{\"is_admin\":true}".to_string()).await.unwrap();
        drop(store);

        let reopened = FileSessionStore::new(&path);
        assert_eq!(
            reopened.get("u1").await.unwrap().as_deref(),
            Some("{\"is_admin\":true}")
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_and_remove_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions.json"));

        store.set("u1", "a".to_string()).await.unwrap();
        store.set("u1", "b".to_string()).await.unwrap();
        assert_eq!(store.get("u1").await.unwrap().as_deref(), Some("b"));

        store.remove("u1").await.unwrap();
        assert_eq!(store.get("u1").await.unwrap(), None);
        // Removing an absent key is not an error.
        store.remove("u1").await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(&path, "not json").await.unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.get("u1").await.is_err());
    }
}
