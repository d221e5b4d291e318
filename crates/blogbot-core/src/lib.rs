//! Domain layer of the blogbot conversational command gateway.
//!
//! Inbound chat messages flow through a per-user state machine that
//! either passes free text to a generative-AI backend or, after a
//! password challenge, executes administrator-registered shell
//! commands. Transport, rendering, and persistence live behind the
//! trait seams defined here and are provided by the infrastructure and
//! interaction crates.

pub mod chat;
pub mod command;
pub mod config;
pub mod conversation;
pub mod credential;
pub mod error;
pub mod session;
pub mod verification;

// Re-export common error type
pub use error::{BotError, Result};
