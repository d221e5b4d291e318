//! In-memory verification-code cache.
//!
//! Backs the account verification flow: codes expire `ttl` after they
//! are set (300 seconds in the account use case), matching the shared
//! cache the blog used for the same purpose.

use async_trait::async_trait;
use blogbot_core::error::Result;
use blogbot_core::verification::CodeCache;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// TTL cache for verification codes, keyed by email address.
pub struct MemoryCodeCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCodeCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCodeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeCache for MemoryCodeCache {
    async fn set(&self, email: &str, code: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires_at)| Instant::now() < *expires_at);
        entries.insert(email.to_string(), (code.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(email)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(code, _)| code.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCodeCache::new();
        cache
            .set("a@example.com", "123456", Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(
            cache.get("a@example.com").await.unwrap().as_deref(),
            Some("123456")
        );
        assert_eq!(cache.get("b@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_code_reads_back_as_absent() {
        let cache = MemoryCodeCache::new();
        cache
            .set("a@example.com", "123456", Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("a@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_previous_code() {
        let cache = MemoryCodeCache::new();
        cache
            .set("a@example.com", "111111", Duration::from_secs(300))
            .await
            .unwrap();
        cache
            .set("a@example.com", "222222", Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(
            cache.get("a@example.com").await.unwrap().as_deref(),
            Some("222222")
        );
    }
}
