//! Per-user conversational command session.

pub mod machine;
pub mod model;

pub use machine::{ConversationMachine, Transition};
pub use model::{ConversationPhase, UserConversationState};
