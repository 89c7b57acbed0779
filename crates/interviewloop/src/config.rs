//! Project configuration file support for interviewloop.
//!
//! Loads configuration from `interviewloop.toml` in the working directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use interviewloop_core::RewardPolicy;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "interviewloop.toml";

/// Environment variable holding the API key unless `api_key_env` says otherwise
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Project-level configuration loaded from `interviewloop.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Global default agent (applies to both interviewer and analyzer)
    pub agent: Option<String>,
    /// Global default model (applies to both interviewer and analyzer)
    pub model: Option<String>,
    /// Command line for the `command` agent, e.g. `["ollama", "run", "llama3"]`
    pub command: Option<Vec<String>>,
    /// Extra environment for the `command` agent, e.g. `OLLAMA_HOST`
    #[serde(default)]
    pub command_env: BTreeMap<String, String>,
    /// Chat completions endpoint override
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Per-call agent timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Answers collected before scoring
    pub threshold: Option<usize>,
    /// Directory of JSON question bank files
    pub questions_dir: Option<PathBuf>,
    /// Wallet owner
    pub user: Option<String>,
    /// File that receives a JSON copy of every progress event
    pub log_file: Option<PathBuf>,
    /// Interviewer persona per domain, replacing the built-in one
    #[serde(default)]
    pub personas: BTreeMap<String, String>,
    #[serde(default)]
    pub interviewer: RoleConfig,
    #[serde(default)]
    pub analyzer: RoleConfig,
    #[serde(default)]
    pub reward: RewardConfig,
}

/// Configuration for a specific role (interviewer or analyzer)
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    pub agent: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RewardConfig {
    pub min_authenticity: Option<u32>,
    pub coins_per_accuracy: Option<f64>,
}

impl ProjectConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Priority: [interviewer].agent > global agent > None
    pub fn interviewer_agent(&self) -> Option<&str> {
        self.interviewer.agent.as_deref().or(self.agent.as_deref())
    }

    /// Priority: [interviewer].model > global model > None
    pub fn interviewer_model(&self) -> Option<&str> {
        self.interviewer.model.as_deref().or(self.model.as_deref())
    }

    /// Priority: [analyzer].agent > global agent > None
    pub fn analyzer_agent(&self) -> Option<&str> {
        self.analyzer.agent.as_deref().or(self.agent.as_deref())
    }

    /// Priority: [analyzer].model > global model > None
    pub fn analyzer_model(&self) -> Option<&str> {
        self.analyzer.model.as_deref().or(self.model.as_deref())
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reward rule with unset fields taken from the default policy
    pub fn reward_policy(&self) -> RewardPolicy {
        let default = RewardPolicy::default();
        RewardPolicy {
            min_authenticity: self
                .reward
                .min_authenticity
                .unwrap_or(default.min_authenticity),
            coins_per_accuracy: self
                .reward
                .coins_per_accuracy
                .unwrap_or(default.coins_per_accuracy),
        }
    }
}
