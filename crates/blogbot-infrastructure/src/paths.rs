//! Filesystem locations for blogbot configuration and data.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Resolves blogbot's directories under the platform config root.
pub struct BotPaths;

impl BotPaths {
    /// Returns the configuration directory (`~/.config/blogbot` on
    /// Linux) without creating it.
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Failed to determine platform config directory")?;
        Ok(base.join("blogbot"))
    }

    /// Returns the configuration directory, creating it if needed.
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        Ok(dir)
    }

    /// Path of the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Path of the secrets file (admin password, API keys).
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.toml"))
    }

    /// Path of the command registry file.
    pub fn commands_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("commands.toml"))
    }

    /// Path of the fallback session file.
    pub fn session_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("sessions.json"))
    }
}
