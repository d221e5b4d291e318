//! Conversation state model.
//!
//! One `UserConversationState` exists per distinct user identifier at
//! a time, living only inside the session store as a JSON snapshot.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Per-user conversation state snapshot.
///
/// Mutated exclusively by the state machine, never shared across
/// users. `Default` is the fresh anonymous state; every reset path
/// (explicit exit, lockout, undecodable snapshot) goes back to it with
/// all fields cleared.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserConversationState {
    /// Whether the user has entered admin mode (via `ADMIN`)
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the password challenge has been passed
    #[serde(default)]
    pub is_password_set: bool,
    /// Consecutive failed password attempts
    #[serde(default)]
    pub failed_attempts: u32,
    /// Command title awaiting `Y` confirmation, if any
    #[serde(default)]
    pub pending_command: Option<String>,
}

/// The phase of the conversation, derived from the snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    /// Not in admin mode; free text passes through to the AI backend.
    Anonymous,
    /// Admin mode entered, password challenge outstanding.
    AwaitingPassword,
    /// Password accepted; free text names a command to run.
    Authenticated,
    /// A command title is pending `Y` confirmation.
    AwaitingConfirmation,
}

impl UserConversationState {
    /// Fresh anonymous state.
    pub fn fresh() -> Self {
        Self::default()
    }

    /// Derives the conversation phase from the snapshot fields.
    pub fn phase(&self) -> ConversationPhase {
        if !self.is_admin {
            ConversationPhase::Anonymous
        } else if !self.is_password_set {
            ConversationPhase::AwaitingPassword
        } else if self.pending_command.is_some() {
            ConversationPhase::AwaitingConfirmation
        } else {
            ConversationPhase::Authenticated
        }
    }

    /// Serializes the snapshot for the session store.
    pub fn to_snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a stored snapshot.
    ///
    /// Callers are expected to collapse the error case to
    /// [`UserConversationState::fresh`]: an undecodable snapshot means
    /// "no prior state", never a fatal fault.
    pub fn from_snapshot(snapshot: &str) -> Result<Self> {
        Ok(serde_json::from_str(snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_anonymous() {
        let state = UserConversationState::fresh();
        assert_eq!(state.phase(), ConversationPhase::Anonymous);
        assert_eq!(state.failed_attempts, 0);
        assert!(state.pending_command.is_none());
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = UserConversationState::fresh();
        state.is_admin = true;
        assert_eq!(state.phase(), ConversationPhase::AwaitingPassword);
        state.is_password_set = true;
        assert_eq!(state.phase(), ConversationPhase::Authenticated);
        state.pending_command = Some("ping".to_string());
        assert_eq!(state.phase(), ConversationPhase::AwaitingConfirmation);
    }

    #[test]
    fn test_snapshot_round_trip_all_reachable_states() {
        let reachable = [
            UserConversationState::fresh(),
            UserConversationState {
                is_admin: true,
                ..Default::default()
            },
            UserConversationState {
                is_admin: true,
                failed_attempts: 2,
                ..Default::default()
            },
            UserConversationState {
                is_admin: true,
                is_password_set: true,
                ..Default::default()
            },
            UserConversationState {
                is_admin: true,
                is_password_set: true,
                pending_command: Some("ping".to_string()),
                ..Default::default()
            },
        ];
        for state in reachable {
            let snapshot = state.to_snapshot().unwrap();
            let decoded = UserConversationState::from_snapshot(&snapshot).unwrap();
            assert_eq!(decoded, state);
        }
    }

    #[test]
    fn test_undecodable_snapshot_is_an_error() {
        assert!(UserConversationState::from_snapshot("not json").is_err());
        assert!(UserConversationState::from_snapshot("").is_err());
    }

    #[test]
    fn test_missing_fields_default() {
        // Older snapshots may omit fields; they decode as fresh values.
        let decoded = UserConversationState::from_snapshot("{}").unwrap();
        assert_eq!(decoded, UserConversationState::fresh());
    }
}
