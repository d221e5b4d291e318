//! Session store trait.
//!
//! Defines the interface for persisting per-user conversation state
//! across independent inbound messages.

use crate::error::Result;
use async_trait::async_trait;

/// An abstract key/value store for serialized per-user conversation
/// state.
///
/// The store is an opaque transport collaborator: TTL and eviction
/// policy belong to the implementation (memcached in the original
/// deployment, a session file as fallback). Values are serialized
/// snapshots; the gateway owns the serialization format and treats a
/// snapshot it cannot decode as "no prior state".
///
/// # Concurrency
///
/// Two concurrent messages from the same user race on
/// read-modify-write; the store is last-writer-wins and provides no
/// compare-and-set.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored snapshot for `user_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(snapshot))`: a snapshot exists and has not expired
    /// - `Ok(None)`: no snapshot stored (or evicted)
    /// - `Err(_)`: the store itself failed
    async fn get(&self, user_id: &str) -> Result<Option<String>>;

    /// Stores a snapshot for `user_id`, replacing any previous one.
    async fn set(&self, user_id: &str, snapshot: String) -> Result<()>;

    /// Removes the snapshot for `user_id`, if any.
    async fn remove(&self, user_id: &str) -> Result<()>;
}
