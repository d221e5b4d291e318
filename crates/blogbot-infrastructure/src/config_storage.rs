//! Configuration loading.
//!
//! Layers `config.toml` and `secret.toml` from the blogbot config
//! directory with an environment overlay. Secrets (admin password,
//! API keys) belong in `secret.toml` so plain settings can be shared
//! or checked in without them; both files accept the same shape.
//!
//! Precedence, highest first: environment, `secret.toml`,
//! `config.toml`.
//!
//! Recognized variables:
//! - `BLOGBOT_ADMIN_PASSWORD`: admin password
//! - `BLOGBOT_ADMIN_TEST_PASSWORD`: fixed non-production override
//! - `OPENAI_API_KEY` / `OPENAI_MODEL_NAME`: chat backend

use crate::paths::BotPaths;
use anyhow::{Context, Result, bail};
use blogbot_core::config::{AdminConfig, BotConfig, OpenAiConfig};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Partial on-disk shape; everything is optional so the other layers
/// can fill gaps.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    admin: Option<AdminSection>,
    #[serde(default)]
    openai: Option<OpenAiSection>,
}

#[derive(Debug, Default, Deserialize)]
struct AdminSection {
    password: Option<String>,
    test_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiSection {
    api_key: Option<String>,
    model_name: Option<String>,
}

/// Loads [`BotConfig`] from the config/secret file pair plus
/// environment overlay.
pub struct ConfigStorage {
    config_path: PathBuf,
    secret_path: PathBuf,
}

impl ConfigStorage {
    /// Storage over the default locations
    /// (`~/.config/blogbot/config.toml` + `secret.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: BotPaths::config_file()?,
            secret_path: BotPaths::secret_file()?,
        })
    }

    /// Storage over explicit file paths.
    pub fn at(config_path: impl AsRef<Path>, secret_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            secret_path: secret_path.as_ref().to_path_buf(),
        }
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Loads the configuration.
    ///
    /// Missing files are fine as long as the layers together provide
    /// an admin password; a present-but-invalid file is an error.
    pub fn load(&self) -> Result<BotConfig> {
        let config = Self::read_file(&self.config_path)?;
        let secret = Self::read_file(&self.secret_path)?;

        let config_admin = config.admin.unwrap_or_default();
        let secret_admin = secret.admin.unwrap_or_default();
        let password = env::var("BLOGBOT_ADMIN_PASSWORD")
            .ok()
            .or(secret_admin.password)
            .or(config_admin.password);
        let Some(password) = password else {
            bail!(
                "Admin password not configured: set BLOGBOT_ADMIN_PASSWORD or [admin].password in {} or {}",
                self.secret_path.display(),
                self.config_path.display()
            );
        };
        let test_password = env::var("BLOGBOT_ADMIN_TEST_PASSWORD")
            .ok()
            .or(secret_admin.test_password)
            .or(config_admin.test_password);

        let config_openai = config.openai.unwrap_or_default();
        let secret_openai = secret.openai.unwrap_or_default();
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .or(secret_openai.api_key)
            .or(config_openai.api_key);
        let model_name = env::var("OPENAI_MODEL_NAME")
            .ok()
            .or(secret_openai.model_name)
            .or(config_openai.model_name);
        let openai = api_key.map(|api_key| OpenAiConfig {
            api_key,
            model_name,
        });

        Ok(BotConfig {
            admin: AdminConfig {
                password,
                test_password,
            },
            openai,
        })
    }
}
