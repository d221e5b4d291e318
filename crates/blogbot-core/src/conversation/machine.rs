//! Conversation state machine.
//!
//! Decides, per inbound message and current per-user state, the next
//! state and the reply text. The machine itself is stateless: it holds
//! only its collaborators and the admin configuration, and every
//! transition is a total function of `(current state, inbound text)`.

use super::model::UserConversationState;
use crate::chat::ChatBackend;
use crate::command::{CommandExecutor, CommandRegistry};
use crate::config::AdminConfig;
use crate::credential;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Reply to `EXIT` from any admin-flagged state.
pub const EXIT_REPLY: &str = "Exit successful";
/// Reply to `ADMIN` from the anonymous state.
pub const ENTER_PASSWORD_REPLY: &str = "Enter the admin password";
/// Reply when the password challenge succeeds.
pub const VALIDATION_PASSED_REPLY: &str =
    "Validation passed, please enter a command or code to execute: enter helpme for help";
/// Reply to a wrong password below the attempt limit.
pub const VALIDATION_FAILED_REPLY: &str =
    "Validation failed, please re-enter the admin password:";
/// Reply when the failed-attempt limit is reached.
pub const LOCKOUT_REPLY: &str = "Exceeded validation attempts";
/// Reply when a confirmed title matches no registered command.
pub const COMMAND_NOT_FOUND_REPLY: &str =
    "No related command found, please type 'helpme' for assistance.";
/// Reply when the AI backend fails.
pub const SERVER_ERROR_REPLY: &str = "Server error";

/// Consecutive wrong passwords before a forced reset.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// The result of one transition: the full new state plus the reply.
///
/// Callers persist `state` before returning `reply` to the transport;
/// a failed persist leaves the previous state in place, there are no
/// partial updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: UserConversationState,
    pub reply: String,
}

impl Transition {
    fn new(state: UserConversationState, reply: impl Into<String>) -> Self {
        Self {
            state,
            reply: reply.into(),
        }
    }
}

/// The per-user conversation state machine.
///
/// Gates free-text chat into either pass-through to the AI backend or
/// an authenticated admin mode that executes registered commands after
/// a password challenge and a `Y` confirmation.
pub struct ConversationMachine {
    registry: Arc<dyn CommandRegistry>,
    executor: Arc<dyn CommandExecutor>,
    chat: Arc<dyn ChatBackend>,
    admin: AdminConfig,
}

impl ConversationMachine {
    /// Creates a machine over the given collaborators.
    pub fn new(
        registry: Arc<dyn CommandRegistry>,
        executor: Arc<dyn CommandExecutor>,
        chat: Arc<dyn ChatBackend>,
        admin: AdminConfig,
    ) -> Self {
        Self {
            registry,
            executor,
            chat,
            admin,
        }
    }

    /// Computes the transition for one inbound message.
    ///
    /// Keyword matching (`EXIT`, `ADMIN`, `HELPME`, `Y`) is
    /// case-insensitive on the trimmed text. Every fault from a
    /// collaborator is collapsed into a user-facing reply here; nothing
    /// propagates to the caller.
    pub async fn step(&self, state: UserConversationState, input: &str) -> Transition {
        let text = input.trim();
        let keyword = text.to_uppercase();

        if state.is_admin && keyword == "EXIT" {
            debug!("admin exit, resetting conversation state");
            return Transition::new(UserConversationState::fresh(), EXIT_REPLY);
        }

        if !state.is_admin && keyword == "ADMIN" {
            let mut next = state;
            next.is_admin = true;
            return Transition::new(next, ENTER_PASSWORD_REPLY);
        }

        if state.is_admin && !state.is_password_set {
            return self.challenge(state, text);
        }

        if state.is_admin && state.is_password_set {
            return self.authenticated(state, text, &keyword).await;
        }

        // Anonymous fall-through: hand the text to the AI backend.
        let reply = match self.chat.complete(text).await {
            Ok(completion) => completion,
            Err(err) => {
                error!(error = %err, "chat backend failed");
                SERVER_ERROR_REPLY.to_string()
            }
        };
        Transition::new(state, reply)
    }

    /// Password challenge handling.
    ///
    /// The failed-attempt counter resets only on success or explicit
    /// exit; re-entering via `ADMIN` does not clear it, so the limit
    /// spans challenge sessions.
    fn challenge(&self, mut state: UserConversationState, text: &str) -> Transition {
        if credential::verify(text, self.admin.effective_password()) {
            state.is_password_set = true;
            state.failed_attempts = 0;
            return Transition::new(state, VALIDATION_PASSED_REPLY);
        }

        state.failed_attempts += 1;
        if state.failed_attempts >= MAX_PASSWORD_ATTEMPTS {
            warn!(
                attempts = state.failed_attempts,
                "password attempt limit reached, resetting conversation state"
            );
            return Transition::new(UserConversationState::fresh(), LOCKOUT_REPLY);
        }
        Transition::new(state, VALIDATION_FAILED_REPLY)
    }

    async fn authenticated(
        &self,
        mut state: UserConversationState,
        text: &str,
        keyword: &str,
    ) -> Transition {
        // A pending confirmation is consumed either way: `Y` executes
        // it, anything else clears it and re-enters general handling
        // for the new text.
        if let Some(title) = state.pending_command.take() {
            if keyword == "Y" {
                let reply = self.run_command(&title).await;
                return Transition::new(state, reply);
            }
        }

        if keyword == "HELPME" {
            let reply = match self.registry.format_help().await {
                Ok(help) => help,
                Err(err) => {
                    warn!(error = %err, "command registry unavailable for help");
                    COMMAND_NOT_FOUND_REPLY.to_string()
                }
            };
            return Transition::new(state, reply);
        }

        state.pending_command = Some(text.to_string());
        let reply = format!("Confirm execution: {text} command?");
        Transition::new(state, reply)
    }

    async fn run_command(&self, title: &str) -> String {
        match self.registry.find(title).await {
            Ok(Some(command)) => {
                debug!(title = %command.title, "executing confirmed command");
                self.executor.execute(&command.invocation).await
            }
            Ok(None) => COMMAND_NOT_FOUND_REPLY.to_string(),
            Err(err) => {
                warn!(error = %err, title, "command registry lookup failed");
                COMMAND_NOT_FOUND_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::conversation::model::ConversationPhase;
    use crate::error::{BotError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

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

    struct RecordingExecutor {
        invocations: Mutex<Vec<String>>,
    }

    impl RecordingExecutor {
        fn new() -> Self {
            Self {
                invocations: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CommandExecutor for RecordingExecutor {
        async fn execute(&self, invocation: &str) -> String {
            self.invocations
                .lock()
                .unwrap()
                .push(invocation.to_string());
            match invocation {
                "echo pong" => "pong".to_string(),
                _ => crate::command::EXECUTION_FAILED_REPLY.to_string(),
            }
        }
    }

    struct EchoChat {
        fail: bool,
    }

    #[async_trait]
    impl ChatBackend for EchoChat {
        async fn complete(&self, prompt: &str) -> Result<String> {
            if self.fail {
                Err(BotError::backend("backend down"))
            } else {
                Ok(format!("ai: {prompt}"))
            }
        }
    }

    fn machine_with(fail_chat: bool) -> (ConversationMachine, Arc<RecordingExecutor>) {
        let executor = Arc::new(RecordingExecutor::new());
        let machine = ConversationMachine::new(
            Arc::new(FixedRegistry(vec![Command::new(
                "ping",
                "echo pong",
                "liveness check",
            )])),
            executor.clone(),
            Arc::new(EchoChat { fail: fail_chat }),
            AdminConfig {
                password: "s3cret".to_string(),
                test_password: None,
            },
        );
        (machine, executor)
    }

    fn machine() -> ConversationMachine {
        machine_with(false).0
    }

    #[tokio::test]
    async fn test_anonymous_text_passes_through_to_chat() {
        let m = machine();
        let t = m.step(UserConversationState::fresh(), "hello there").await;
        assert_eq!(t.reply, "ai: hello there");
        assert_eq!(t.state, UserConversationState::fresh());
    }

    #[tokio::test]
    async fn test_chat_backend_fault_is_soft() {
        let (m, _) = machine_with(true);
        let t = m.step(UserConversationState::fresh(), "hello").await;
        assert_eq!(t.reply, SERVER_ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_admin_enters_password_challenge() {
        let m = machine();
        let t = m.step(UserConversationState::fresh(), "admin").await;
        assert_eq!(t.reply, ENTER_PASSWORD_REPLY);
        assert_eq!(t.state.phase(), ConversationPhase::AwaitingPassword);
    }

    #[tokio::test]
    async fn test_admin_keyword_keeps_failed_attempt_history() {
        let m = machine();
        let t = m.step(UserConversationState::fresh(), "ADMIN").await;
        let t = m.step(t.state, "wrong").await;
        assert_eq!(t.state.failed_attempts, 1);
        // "ADMIN" during the challenge is just another wrong password;
        // it neither restarts the challenge nor resets the counter.
        let t = m.step(t.state, "ADMIN").await;
        assert_eq!(t.state.failed_attempts, 2);
        assert_eq!(t.reply, VALIDATION_FAILED_REPLY);
    }

    #[tokio::test]
    async fn test_correct_password_authenticates_and_resets_counter() {
        let m = machine();
        let t = m.step(UserConversationState::fresh(), "admin").await;
        let t = m.step(t.state, "nope").await;
        let t = m.step(t.state, "s3cret").await;
        assert_eq!(t.reply, VALIDATION_PASSED_REPLY);
        assert_eq!(t.state.phase(), ConversationPhase::Authenticated);
        assert_eq!(t.state.failed_attempts, 0);
    }

    #[tokio::test]
    async fn test_test_password_override() {
        let executor = Arc::new(RecordingExecutor::new());
        let m = ConversationMachine::new(
            Arc::new(FixedRegistry(Vec::new())),
            executor,
            Arc::new(EchoChat { fail: false }),
            AdminConfig {
                password: "s3cret".to_string(),
                test_password: Some("123".to_string()),
            },
        );
        let t = m.step(UserConversationState::fresh(), "admin").await;
        let t = m.step(t.state, "s3cret").await;
        assert_eq!(t.reply, VALIDATION_FAILED_REPLY);
        let t = m.step(t.state, "123").await;
        assert_eq!(t.reply, VALIDATION_PASSED_REPLY);
    }

    #[tokio::test]
    async fn test_three_wrong_passwords_reset_to_anonymous() {
        let m = machine();
        let mut state = m.step(UserConversationState::fresh(), "admin").await.state;
        for _ in 0..2 {
            let t = m.step(state, "wrong").await;
            assert_eq!(t.reply, VALIDATION_FAILED_REPLY);
            state = t.state;
        }
        let t = m.step(state, "wrong").await;
        assert_eq!(t.reply, LOCKOUT_REPLY);
        assert_eq!(t.state, UserConversationState::fresh());
        // After lockout, HELPME is plain chat, not a command.
        let t = m.step(t.state, "helpme").await;
        assert_eq!(t.reply, "ai: helpme");
    }

    #[tokio::test]
    async fn test_exit_from_any_admin_state() {
        let m = machine();
        let awaiting = m.step(UserConversationState::fresh(), "admin").await.state;
        let t = m.step(awaiting, "exit").await;
        assert_eq!(t.reply, EXIT_REPLY);
        assert_eq!(t.state, UserConversationState::fresh());

        let confirming = UserConversationState {
            is_admin: true,
            is_password_set: true,
            pending_command: Some("ping".to_string()),
            ..Default::default()
        };
        let t = m.step(confirming, "EXIT").await;
        assert_eq!(t.reply, EXIT_REPLY);
        assert_eq!(t.state, UserConversationState::fresh());
    }

    #[tokio::test]
    async fn test_helpme_returns_registry_help() {
        let m = machine();
        let authed = UserConversationState {
            is_admin: true,
            is_password_set: true,
            ..Default::default()
        };
        let t = m.step(authed.clone(), "HELPME").await;
        assert_eq!(t.reply, "ping: liveness check\n");
        assert_eq!(t.state, authed);
    }

    #[tokio::test]
    async fn test_command_confirmation_flow() {
        let (m, executor) = machine_with(false);
        let authed = UserConversationState {
            is_admin: true,
            is_password_set: true,
            ..Default::default()
        };
        let t = m.step(authed, "ping").await;
        assert_eq!(t.reply, "Confirm execution: ping command?");
        assert_eq!(t.state.pending_command.as_deref(), Some("ping"));

        let t = m.step(t.state, "y").await;
        assert_eq!(t.reply, "pong");
        assert!(t.state.pending_command.is_none());
        assert_eq!(t.state.phase(), ConversationPhase::Authenticated);
        assert_eq!(
            executor.invocations.lock().unwrap().as_slice(),
            ["echo pong"]
        );
    }

    #[tokio::test]
    async fn test_pending_command_lookup_is_case_insensitive() {
        let m = machine();
        let confirming = UserConversationState {
            is_admin: true,
            is_password_set: true,
            pending_command: Some("PING".to_string()),
            ..Default::default()
        };
        let t = m.step(confirming, "Y").await;
        assert_eq!(t.reply, "pong");
    }

    #[tokio::test]
    async fn test_unknown_command_reports_not_found() {
        let m = machine();
        let confirming = UserConversationState {
            is_admin: true,
            is_password_set: true,
            pending_command: Some("reboot".to_string()),
            ..Default::default()
        };
        let t = m.step(confirming, "Y").await;
        assert_eq!(t.reply, COMMAND_NOT_FOUND_REPLY);
        assert!(t.state.pending_command.is_none());
    }

    #[tokio::test]
    async fn test_non_confirmation_replaces_pending_command() {
        let (m, executor) = machine_with(false);
        let confirming = UserConversationState {
            is_admin: true,
            is_password_set: true,
            pending_command: Some("ping".to_string()),
            ..Default::default()
        };
        // Anything but Y abandons the pending command and the new text
        // re-enters general authenticated handling.
        let t = m.step(confirming.clone(), "disk").await;
        assert_eq!(t.reply, "Confirm execution: disk command?");
        assert_eq!(t.state.pending_command.as_deref(), Some("disk"));
        assert!(executor.invocations.lock().unwrap().is_empty());

        // HELPME while confirming clears the pending command too.
        let t = m.step(confirming, "helpme").await;
        assert_eq!(t.reply, "ping: liveness check\n");
        assert!(t.state.pending_command.is_none());
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let m = machine();
        let t = m.step(UserConversationState::fresh(), "  admin  ").await;
        assert_eq!(t.reply, ENTER_PASSWORD_REPLY);
    }
}
