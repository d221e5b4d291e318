//! Gateway assembly.
//!
//! Builds a [`ChatGateway`] from loaded configuration with the default
//! adapter set: TOML command registry, shell executor, OpenAI backend
//! (or the disabled stub), and a session store selected at startup
//! with an availability probe.

use crate::gateway::ChatGateway;
use anyhow::{Context, Result};
use blogbot_core::chat::ChatBackend;
use blogbot_core::config::BotConfig;
use blogbot_core::conversation::ConversationMachine;
use blogbot_core::session::SessionStore;
use blogbot_infrastructure::{
    BotPaths, FileSessionStore, MemorySessionStore, ShellExecutor, TomlCommandRegistry,
};
use blogbot_interaction::{DisabledChatBackend, OpenAiChatBackend};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Session snapshots expire after an hour of inactivity in the
/// in-memory store, mirroring the shared-cache TTL of the original
/// deployment.
const SESSION_TTL: Duration = Duration::from_secs(3600);

/// Key used for the availability round trip; never a real user id.
const PROBE_KEY: &str = "__store_probe__";

/// Picks the session store once at startup.
///
/// The primary store is probed with a write/read/remove round trip;
/// if it misbehaves the gateway degrades to the fallback store, the
/// same way the original deployment checked its shared cache and fell
/// back to a session file.
pub async fn select_session_store(
    primary: Arc<dyn SessionStore>,
    fallback: Arc<dyn SessionStore>,
) -> Arc<dyn SessionStore> {
    if store_available(primary.as_ref()).await {
        primary
    } else {
        warn!("primary session store unavailable, falling back");
        fallback
    }
}

async fn store_available(store: &dyn SessionStore) -> bool {
    if store.set(PROBE_KEY, "ok".to_string()).await.is_err() {
        return false;
    }
    let ok = matches!(store.get(PROBE_KEY).await, Ok(Some(v)) if v == "ok");
    let _ = store.remove(PROBE_KEY).await;
    ok
}

/// Builds a gateway with the default adapters over the given store.
///
/// `commands_path` is the TOML command registry file; pass
/// [`BotPaths::commands_file`] for the standard location.
pub async fn build_gateway(
    config: &BotConfig,
    commands_path: PathBuf,
    store: Arc<dyn SessionStore>,
) -> Result<ChatGateway> {
    let registry = TomlCommandRegistry::load(&commands_path)
        .await
        .with_context(|| format!("Failed to load command registry: {}", commands_path.display()))?;

    let chat: Arc<dyn ChatBackend> = match &config.openai {
        Some(openai) => Arc::new(OpenAiChatBackend::from_config(openai)),
        None => {
            info!("no OpenAI configuration, chat pass-through disabled");
            Arc::new(DisabledChatBackend)
        }
    };

    let machine = ConversationMachine::new(
        Arc::new(registry),
        Arc::new(ShellExecutor::new()),
        chat,
        config.admin.clone(),
    );

    Ok(ChatGateway::new(machine, store))
}

/// Builds a gateway from the standard config locations: in-memory TTL
/// store as primary, session file as fallback.
pub async fn build_default_gateway(config: &BotConfig) -> Result<ChatGateway> {
    let primary: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::with_ttl(SESSION_TTL));
    let fallback: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(BotPaths::session_file()?));
    let store = select_session_store(primary, fallback).await;
    build_gateway(config, BotPaths::commands_file()?, store).await
}
