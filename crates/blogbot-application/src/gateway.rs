//! Chat gateway use case.
//!
//! One inbound message flows through: look up the per-user snapshot,
//! run the state machine, persist the new state, return the reply.
//! Every fault along that path is recovered locally; the transport
//! only ever sees reply text.

use blogbot_core::conversation::{ConversationMachine, Transition, UserConversationState};
use blogbot_core::session::SessionStore;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Entry point the messaging transport calls for the fall-through
/// (non-keyword) handler.
pub struct ChatGateway {
    machine: ConversationMachine,
    store: Arc<dyn SessionStore>,
}

impl ChatGateway {
    /// Creates a gateway over a state machine and a session store.
    pub fn new(machine: ConversationMachine, store: Arc<dyn SessionStore>) -> Self {
        Self { machine, store }
    }

    /// Handles one inbound message from `user_id` and returns the
    /// reply text.
    ///
    /// The new state is persisted before the reply is returned; if the
    /// persist fails the previous snapshot stays in place (the reply
    /// is still returned, matching the soft-failure contract).
    pub async fn handle(&self, user_id: &str, text: &str) -> String {
        let state = self.load_state(user_id).await;
        let Transition { state: next, reply } = self.machine.step(state.clone(), text).await;

        if next != state {
            // Reset transitions (exit, lockout) drop the snapshot
            // entirely; a fresh one is recreated on the next message.
            if next == UserConversationState::fresh() {
                self.clear_state(user_id).await;
            } else {
                self.persist_state(user_id, &next).await;
            }
        }
        reply
    }

    /// Loads the stored state for `user_id`.
    ///
    /// Absent, expired, undecodable, or unreadable snapshots all
    /// collapse to the fresh anonymous state.
    async fn load_state(&self, user_id: &str) -> UserConversationState {
        let snapshot = match self.store.get(user_id).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return UserConversationState::fresh(),
            Err(err) => {
                warn!(error = %err, user_id, "session store read failed, starting fresh");
                return UserConversationState::fresh();
            }
        };

        match UserConversationState::from_snapshot(&snapshot) {
            Ok(state) => state,
            Err(err) => {
                debug!(error = %err, user_id, "undecodable session snapshot, starting fresh");
                UserConversationState::fresh()
            }
        }
    }

    async fn persist_state(&self, user_id: &str, state: &UserConversationState) {
        let snapshot = match state.to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(error = %err, user_id, "failed to serialize session state");
                return;
            }
        };
        if let Err(err) = self.store.set(user_id, snapshot).await {
            error!(error = %err, user_id, "failed to persist session state");
        }
    }

    async fn clear_state(&self, user_id: &str) {
        if let Err(err) = self.store.remove(user_id).await {
            error!(error = %err, user_id, "failed to clear session state");
        }
    }
}
