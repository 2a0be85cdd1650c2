//! Configuration loading for Polyglot services
//!
//! Settings live in a TOML file resolved with the following priority:
//! 1. Command-line argument (highest)
//! 2. `POLYGLOT_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/polyglot/config.toml` on Linux)
//!
//! A missing config file is not fatal: the service starts with compiled
//! defaults and a warning, provided the required secrets are supplied via
//! environment variables.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Environment variable naming the config file location.
pub const CONFIG_ENV_VAR: &str = "POLYGLOT_CONFIG";
/// Environment override for the database path.
pub const DATABASE_PATH_ENV_VAR: &str = "POLYGLOT_DATABASE_PATH";
/// Environment override for the LLM API key.
pub const LLM_API_KEY_ENV_VAR: &str = "POLYGLOT_LLM_API_KEY";

/// Top-level TOML configuration file schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub database: DatabaseConfig,
    pub llm: LlmSection,
    pub queue: QueueConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file path.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("polyglot.db"),
        }
    }
}

/// `[llm]` section: a provider selector plus a table of named providers.
///
/// The original deployment switched between hosted model providers at
/// runtime; here the choice is made once at startup and resolved into a
/// single [`LlmConfig`] handed to the client constructor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// Name of the entry in `providers` to use.
    pub provider: String,
    /// Request timeout in seconds. Model responses can be very slow.
    pub timeout_secs: u64,
    pub providers: std::collections::HashMap<String, LlmProvider>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "deepseek".to_string(),
            timeout_secs: 1500,
            providers: std::collections::HashMap::new(),
        }
    }
}

/// One named provider entry under `[llm.providers.<name>]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LlmProvider {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Resolved LLM client configuration (explicit, never ambient).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: std::time::Duration,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum messages leased per poll.
    pub batch_size: u32,
    /// Sleep between polls when the queue is empty.
    pub poll_interval_secs: u64,
    /// Lease duration; an unacked message is redelivered after this lapses.
    pub visibility_timeout_secs: u64,
    /// Delivery attempts before a message is parked as dead.
    pub max_attempts: u32,
    /// Wall-clock ceiling for a single job handler.
    pub handler_timeout_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            poll_interval_secs: 5,
            visibility_timeout_secs: 900,
            max_attempts: 5,
            handler_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Character budget passed to the summarization prompt.
    pub summary_length: u32,
    /// When set, translated inserts store `max_rank - rank` instead of the
    /// source rank. Applies on insert only; updates never touch rank.
    pub max_rank: Option<i64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            summary_length: 100,
            max_rank: None,
        }
    }
}

impl TomlConfig {
    /// Load configuration from the resolved path, falling back to defaults
    /// when no file is found.
    pub fn load(cli_path: Option<&PathBuf>) -> Result<Self> {
        let path = resolve_config_path(cli_path);
        let mut config = match path {
            Some(ref p) if p.exists() => {
                let content = std::fs::read_to_string(p)?;
                toml::from_str::<TomlConfig>(&content)
                    .map_err(|e| Error::Config(format!("{}: {}", p.display(), e)))?
            }
            Some(ref p) => {
                warn!("Config file not found: {}, using defaults", p.display());
                TomlConfig::default()
            }
            None => {
                warn!("No config file location resolved, using defaults");
                TomlConfig::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over file contents for secrets and paths.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(DATABASE_PATH_ENV_VAR) {
            self.database.path = PathBuf::from(path);
        }
        if let Ok(key) = std::env::var(LLM_API_KEY_ENV_VAR) {
            let provider = self.llm.provider.clone();
            self.llm.providers.entry(provider).or_default().api_key = key;
        }
    }

    /// Resolve the `[llm]` section into the single client configuration.
    pub fn llm_config(&self) -> Result<LlmConfig> {
        let provider = self.llm.providers.get(&self.llm.provider).ok_or_else(|| {
            Error::Config(format!(
                "LLM provider '{}' has no [llm.providers.{}] entry",
                self.llm.provider, self.llm.provider
            ))
        })?;
        if provider.api_key.is_empty() {
            return Err(Error::Config(format!(
                "LLM provider '{}' has no API key; set it in the config file or via {}",
                self.llm.provider, LLM_API_KEY_ENV_VAR
            )));
        }
        if provider.base_url.is_empty() || provider.model.is_empty() {
            return Err(Error::Config(format!(
                "LLM provider '{}' is missing base_url or model",
                self.llm.provider
            )));
        }
        Ok(LlmConfig {
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            api_key: provider.api_key.clone(),
            model: provider.model.clone(),
            timeout: std::time::Duration::from_secs(self.llm.timeout_secs),
        })
    }
}

/// Resolve the config file path: CLI argument, then environment variable,
/// then the platform config directory.
pub fn resolve_config_path(cli_path: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.clone());
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("polyglot").join("config.toml"))
}
