use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{defaults, endpoints, models, paths};
use crate::error::HuddleError;
use crate::llm::ClaudeClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LlmSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub model: String,
    /// Name of the environment variable holding the API credential.
    pub api_key_env: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: defaults::BIND_ADDR.to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmSettings {
                model: models::DEFAULT_CLAUDE_MODEL.to_string(),
                api_key_env: defaults::API_KEY_ENV.to_string(),
                base_url: None,
                max_tokens: defaults::MAX_TOKENS,
            },
            server: ServerSettings::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    /// Load from the default location, falling back to defaults on any problem.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable config {}: {}", config_path.display(), e)
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, HuddleError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| HuddleError::Toml(e.to_string()))
    }

    pub fn save(&self) -> Result<(), HuddleError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), HuddleError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HuddleError::Toml(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the API key from the environment variable specified in settings.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// Build the Claude client for the current settings.
    ///
    /// A missing credential is not an error here: the client is built without
    /// a key and every call made through it falls back.
    pub fn build_llm_client(&self) -> ClaudeClient {
        let api_key = self.api_key();
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; every model invocation will return the fallback message",
                self.llm.api_key_env
            );
        }
        ClaudeClient::new(api_key)
            .with_model(self.llm.model.clone())
            .with_max_tokens(self.llm.max_tokens)
            .with_base_url(
                self.llm
                    .base_url
                    .clone()
                    .unwrap_or_else(|| endpoints::CLAUDE_BASE_URL.to_string()),
            )
    }
}
