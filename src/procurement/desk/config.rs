//! Configuration loading for the desk.
//!
//! Settings come from an optional TOML file. Every section and key has a
//! default so an empty file, or no file at all, yields a working setup.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::procurement::desk::error::{Result, ToolError};

/// Default config filename looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "procurement-desk.toml";
/// Environment variable override for the config path.
pub const CONFIG_ENV_VAR: &str = "PROCUREMENT_DESK_CONFIG";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskConfig {
    pub paths: PathsConfig,
    pub policy: PolicyConfig,
    pub generator: GeneratorConfig,
    pub llm: LlmConfig,
}

/// Where the material store lives and where artefacts are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub data_file: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("raw_materials.json"),
            output_dir: PathBuf::from("."),
        }
    }
}

impl PathsConfig {
    /// Resolves an artefact name inside the output directory.
    pub fn output(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// Thresholds used by the decision function and the auditors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Purchases strictly below this price are approved automatically.
    pub price_threshold: f64,
    /// Items with fewer days on hand are low stock.
    pub low_stock_days: i64,
    /// Items with at most this many days on hand are critical.
    pub critical_stock_days: i64,
    /// Data files older than this are reported as stale.
    pub stale_after_days: u64,
    /// Lead times above this are flagged as excessive.
    pub max_lead_time_days: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            price_threshold: 1000.0,
            low_stock_days: 5,
            critical_stock_days: 1,
            stale_after_days: 30,
            max_lead_time_days: 365,
        }
    }
}

/// Shape of the synthetic data set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub regular_items: usize,
    pub interchangeable_pairs: usize,
    /// Probability that any single compliance document is on file.
    pub document_submission_rate: f64,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            regular_items: 44,
            interchangeable_pairs: 3,
            document_submission_rate: 0.8,
            seed: None,
        }
    }
}

/// Hosted language model settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_version: String,
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Draft emails locally instead of calling the endpoint.
    pub offline: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-sonnet-20240229".to_string(),
            api_version: "2023-06-01".to_string(),
            max_tokens: 1000,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            timeout_secs: 30,
            offline: false,
        }
    }
}

impl DeskConfig {
    /// Loads configuration from `path`, the environment override, or the
    /// default file name, falling back to built-in defaults when none exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let resolved = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ToolError::MissingInput(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => resolve_implicit_path(),
        };

        let config = match resolved {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                let content = fs::read_to_string(&path)?;
                Self::from_toml(&content)?
            }
            None => {
                debug!("no configuration file found, using defaults");
                Self::default()
            }
        };
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(self.policy.price_threshold > 0.0) {
            return Err(ToolError::InvalidConfig(
                "policy.price_threshold must be positive".to_string(),
            ));
        }
        if self.policy.critical_stock_days >= self.policy.low_stock_days {
            return Err(ToolError::InvalidConfig(
                "policy.critical_stock_days must be below policy.low_stock_days".to_string(),
            ));
        }
        let rate = self.generator.document_submission_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ToolError::InvalidConfig(format!(
                "generator.document_submission_rate must be within [0, 1], got {rate}"
            )));
        }
        if self.llm.endpoint.trim().is_empty() || self.llm.model.trim().is_empty() {
            return Err(ToolError::InvalidConfig(
                "llm.endpoint and llm.model are required".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve_implicit_path() -> Option<PathBuf> {
    if let Ok(value) = env::var(CONFIG_ENV_VAR) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    let local = PathBuf::from(DEFAULT_CONFIG_NAME);
    local.exists().then_some(local)
}
