//! Administrator-defined commands: model, registry, executor seam.

pub mod executor;
pub mod model;
pub mod repository;

pub use executor::{CommandExecutor, EXECUTION_FAILED_REPLY};
pub use model::Command;
pub use repository::CommandRegistry;
