//! Command domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, pre-registered shell command.
///
/// Commands are created and edited by an administrator through the
/// persisted registry; the conversation state machine only ever reads
/// them. Title matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Human-readable command title (unique, case-insensitive)
    pub title: String,
    /// The shell invocation executed on confirmation
    pub invocation: String,
    /// Human-readable description shown in help text
    pub description: String,
    /// Timestamp when the command was registered
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last edit
    pub last_modified_at: DateTime<Utc>,
}

impl Command {
    /// Creates a new command with both timestamps set to now.
    pub fn new(
        title: impl Into<String>,
        invocation: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            invocation: invocation.into(),
            description: description.into(),
            created_at: now,
            last_modified_at: now,
        }
    }

    /// Case-insensitive title match.
    pub fn matches_title(&self, title: &str) -> bool {
        self.title.eq_ignore_ascii_case(title.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_title_ignores_case_and_whitespace() {
        let cmd = Command::new("ping", "echo pong", "liveness check");
        assert!(cmd.matches_title("PING"));
        assert!(cmd.matches_title("  ping "));
        assert!(!cmd.matches_title("pong"));
    }
}
