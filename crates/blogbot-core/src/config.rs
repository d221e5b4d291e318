//! Configuration models for the gateway.
//!
//! The infrastructure crate loads these from `~/.config/blogbot`
//! (`config.toml` + `secret.toml`) with environment-variable fallback;
//! the core only defines the shapes.

use serde::{Deserialize, Serialize};

/// Admin-mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The admin password the credential gate verifies against.
    pub password: String,
    /// Fixed override password for non-production environments.
    ///
    /// When set, it replaces `password` entirely (matching the blog's
    /// `TESTING` switch). Never set this in production.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_password: Option<String>,
}

impl AdminConfig {
    /// Returns the password the challenge should verify against.
    pub fn effective_password(&self) -> &str {
        self.test_password.as_deref().unwrap_or(&self.password)
    }
}

/// OpenAI chat backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Model name; the interaction crate falls back to its default
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Root configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub admin: AdminConfig,
    /// Absent when the AI pass-through is disabled; the gateway then
    /// answers anonymous chat with the soft backend-failure reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAiConfig>,
}
