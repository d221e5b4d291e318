//! Generative-AI chat backend trait.

use crate::error::Result;
use async_trait::async_trait;

/// A generative-AI chat backend.
///
/// Anonymous free text that matches no other handler is passed through
/// here. The backend may fail (network, quota, auth); the gateway
/// collapses any error into the fixed "Server error" reply rather than
/// surfacing it to the transport.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends a single-turn prompt and returns the completion text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
