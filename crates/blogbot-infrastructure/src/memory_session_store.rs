//! In-memory session store.
//!
//! The primary deployment keeps session snapshots in a shared cache
//! (memcached in the original blog); inside a single process this
//! store plays that role, including TTL-based expiry.

use async_trait::async_trait;
use blogbot_core::error::Result;
use blogbot_core::session::SessionStore;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry {
    snapshot: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Session store keeping snapshots in process memory.
pub struct MemorySessionStore {
    ttl: Option<Duration>,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    /// Store without expiry.
    pub fn new() -> Self {
        Self {
            ttl: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store whose entries expire `ttl` after their last write.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(user_id)
            .filter(|entry| !entry.expired())
            .map(|entry| entry.snapshot.clone()))
    }

    async fn set(&self, user_id: &str, snapshot: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        // Expired entries are dropped lazily on write.
        entries.retain(|_, entry| !entry.expired());
        entries.insert(
            user_id.to_string(),
            Entry {
                snapshot,
                expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn remove(&self, user_id: &str) -> Result<()> {
        self.entries.write().await.remove(user_id);
        Ok(())
    }
}
