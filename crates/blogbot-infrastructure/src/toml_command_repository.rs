//! TOML-file command registry.
//!
//! The administrator maintains registered commands in a single TOML
//! file (`commands.toml`):
//!
//! ```text
//! [[commands]]
//! title = "ping"
//! invocation = "echo pong"
//! description = "liveness check"
//! ```
//!
//! The file is read once at load time and kept in memory; edits go
//! through [`TomlCommandRegistry::add`] which writes back atomically
//! (tmp file + rename).

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use blogbot_core::command::{Command, CommandRegistry};
use blogbot_core::error::{BotError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CommandFile {
    #[serde(default)]
    commands: Vec<Command>,
}

/// Command registry backed by a TOML file.
pub struct TomlCommandRegistry {
    path: PathBuf,
    commands: RwLock<Vec<Command>>,
}

impl TomlCommandRegistry {
    /// Loads the registry from `path`.
    ///
    /// A missing file yields an empty registry; a present-but-invalid
    /// file is an error.
    pub async fn load(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref().to_path_buf();
        let commands = if fs::try_exists(&path).await.unwrap_or(false) {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file: CommandFile = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            file.commands
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            commands: RwLock::new(commands),
        })
    }

    /// Registers a new command and persists the registry.
    ///
    /// Titles are unique case-insensitively; registering a duplicate
    /// is a data-access error.
    pub async fn add(
        &self,
        title: impl Into<String>,
        invocation: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let command = Command::new(title, invocation, description);
        let mut commands = self.commands.write().await;
        if commands.iter().any(|c| c.matches_title(&command.title)) {
            return Err(BotError::data_access(format!(
                "command '{}' already registered",
                command.title
            )));
        }
        commands.push(command);
        self.persist(&commands).await
    }

    /// Removes a command by title and persists the registry.
    pub async fn remove(&self, title: &str) -> Result<()> {
        let mut commands = self.commands.write().await;
        let before = commands.len();
        commands.retain(|c| !c.matches_title(title));
        if commands.len() == before {
            return Err(BotError::not_found("command", title));
        }
        self.persist(&commands).await
    }

    /// Replaces the invocation and description of an existing command.
    pub async fn update(&self, title: &str, invocation: &str, description: &str) -> Result<()> {
        let mut commands = self.commands.write().await;
        let Some(command) = commands.iter_mut().find(|c| c.matches_title(title)) else {
            return Err(BotError::not_found("command", title));
        };
        command.invocation = invocation.to_string();
        command.description = description.to_string();
        command.last_modified_at = Utc::now();
        self.persist(&commands).await
    }

    /// Writes the registry atomically: serialize to a tmp file next to
    /// the target, then rename over it.
    async fn persist(&self, commands: &[Command]) -> Result<()> {
        let file = CommandFile {
            commands: commands.to_vec(),
        };
        let content = toml::to_string_pretty(&file)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, content.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CommandRegistry for TomlCommandRegistry {
    async fn find(&self, title: &str) -> Result<Option<Command>> {
        let commands = self.commands.read().await;
        Ok(commands.iter().find(|c| c.matches_title(title)).cloned())
    }

    async fn list(&self) -> Result<Vec<Command>> {
        Ok(self.commands.read().await.clone())
    }
}
