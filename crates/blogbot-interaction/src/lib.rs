//! Generative-AI chat backends for the blogbot gateway.

pub mod openai_chat_backend;

pub use crate::openai_chat_backend::OpenAiChatBackend;

use async_trait::async_trait;
use blogbot_core::chat::ChatBackend;
use blogbot_core::error::{BotError, Result};

/// Backend used when no chat provider is configured.
///
/// Always fails, so the gateway answers anonymous chat with its soft
/// backend-failure reply instead of silence.
pub struct DisabledChatBackend;

#[async_trait]
impl ChatBackend for DisabledChatBackend {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(BotError::backend("no chat backend configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_backend_always_fails() {
        assert!(DisabledChatBackend.complete("hello").await.is_err());
    }
}
