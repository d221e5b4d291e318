//! Use-case layer of the blogbot gateway: wires the conversation state
//! machine to its session store, command registry, executor, and chat
//! backend, and hosts the account verification-code flow.

pub mod bootstrap;
pub mod gateway;
pub mod verification;

pub use crate::bootstrap::{build_default_gateway, build_gateway, select_session_store};
pub use crate::gateway::ChatGateway;
pub use crate::verification::VerificationService;
