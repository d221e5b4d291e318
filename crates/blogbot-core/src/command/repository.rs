//! Command registry trait.
//!
//! Defines the read interface the conversation state machine uses to
//! resolve and describe registered commands.

use super::model::Command;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract registry of administrator-defined commands.
///
/// Decouples the state machine from the storage mechanism (a TOML file
/// in the default deployment, a database table in the original blog).
/// Lookup is case-insensitive on title; `list` preserves registration
/// order so help text is stable.
#[async_trait]
pub trait CommandRegistry: Send + Sync {
    /// Finds a command by title, case-insensitively.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(command))`: a command with that title exists
    /// - `Ok(None)`: no match; the caller turns this into a soft
    ///   "no related command found" reply, never an error
    /// - `Err(_)`: the registry storage failed
    async fn find(&self, title: &str) -> Result<Option<Command>>;

    /// Lists all registered commands in registration order.
    async fn list(&self) -> Result<Vec<Command>>;

    /// Formats help text as one "title: description" line per command.
    async fn format_help(&self) -> Result<String> {
        let commands = self.list().await?;
        let mut help = String::new();
        for command in &commands {
            help.push_str(&command.title);
            help.push_str(": ");
            help.push_str(&command.description);
            help.push('\n');
        }
        Ok(help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRegistry(Vec<Command>);

    #[async_trait]
    impl CommandRegistry for FixedRegistry {
        async fn find(&self, title: &str) -> Result<Option<Command>> {
            Ok(self.0.iter().find(|c| c.matches_title(title)).cloned())
        }

        async fn list(&self) -> Result<Vec<Command>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_format_help_preserves_registration_order() {
        let registry = FixedRegistry(vec![
            Command::new("ping", "echo pong", "liveness check"),
            Command::new("disk", "df -h", "disk usage"),
        ]);
        let help = registry.format_help().await.unwrap();
        assert_eq!(help, "ping: liveness check\ndisk: disk usage\n");
    }

    #[tokio::test]
    async fn test_format_help_empty_registry() {
        let registry = FixedRegistry(Vec::new());
        assert_eq!(registry.format_help().await.unwrap(), "");
    }
}
