//! Session configuration loaded from an optional TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::path_validator::MAX_FILES_PER_ROUND;

/// Environment variable that may point at a config file.
pub const CONFIG_ENV: &str = "ASKREPO_CONFIG";

/// askrepo configuration (TOML).
///
/// Every field is optional in the file. Missing fields default to the values
/// the retrieval loop was tuned with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AskConfig {
    pub session: SessionConfig,
    pub index: IndexConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on retrieval rounds before giving up as insufficient.
    pub max_iterations: u32,

    /// Reasoning-service attempts per selection before returning an empty one.
    pub max_selection_attempts: u32,

    /// Maximum number of files a single selection may name (at most 10).
    pub max_files_per_round: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_selection_attempts: 3,
            max_files_per_round: MAX_FILES_PER_ROUND,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexConfig {
    /// File extensions (without the dot) included in the project index.
    pub extensions: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extensions: ["py", "js", "java", "cpp", "h", "cs", "go", "rb"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of an OpenAI-compatible chat-completions API.
    pub base_url: String,

    pub model: String,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.x.ai/v1".to_string(),
            model: "grok-3-mini-beta".to_string(),
            api_key_env: "XAI_API_KEY".to_string(),
            timeout_secs: 300,
        }
    }
}

impl AskConfig {
    pub fn validate(&self) -> Result<()> {
        if self.session.max_iterations == 0 {
            return Err(anyhow!("session.max_iterations must be > 0"));
        }
        if self.session.max_selection_attempts == 0 {
            return Err(anyhow!("session.max_selection_attempts must be > 0"));
        }
        if self.session.max_files_per_round == 0
            || self.session.max_files_per_round > MAX_FILES_PER_ROUND
        {
            return Err(anyhow!(
                "session.max_files_per_round must be between 1 and {MAX_FILES_PER_ROUND}"
            ));
        }
        if self.index.extensions.is_empty()
            || self.index.extensions.iter().any(|ext| ext.trim().is_empty())
        {
            return Err(anyhow!("index.extensions must be a non-empty array"));
        }
        if self.service.base_url.trim().is_empty() {
            return Err(anyhow!("service.base_url must not be empty"));
        }
        if self.service.model.trim().is_empty() {
            return Err(anyhow!("service.model must not be empty"));
        }
        if self.service.api_key_env.trim().is_empty() {
            return Err(anyhow!("service.api_key_env must not be empty"));
        }
        if self.service.timeout_secs == 0 {
            return Err(anyhow!("service.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AskConfig::default()`.
pub fn load_config(path: &Path) -> Result<AskConfig> {
    if !path.exists() {
        let cfg = AskConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AskConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load config from the file named by `ASKREPO_CONFIG`, or defaults when unset.
pub fn load_config_from_env() -> Result<AskConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_config(Path::new(&path)),
        None => {
            let cfg = AskConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}
