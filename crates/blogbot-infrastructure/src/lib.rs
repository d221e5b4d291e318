//! Infrastructure adapters for the blogbot gateway: configuration
//! loading, command registry storage, session stores, code cache, and
//! the shell executor.

pub mod config_storage;
pub mod file_session_store;
pub mod memory_code_cache;
pub mod memory_session_store;
pub mod paths;
pub mod shell_executor;
pub mod toml_command_repository;

pub use crate::config_storage::ConfigStorage;
pub use crate::file_session_store::FileSessionStore;
pub use crate::memory_code_cache::MemoryCodeCache;
pub use crate::memory_session_store::MemorySessionStore;
pub use crate::paths::BotPaths;
pub use crate::shell_executor::ShellExecutor;
pub use crate::toml_command_repository::TomlCommandRegistry;
