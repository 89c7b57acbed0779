use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::AgentOutput;

/// Errors that can occur while asking an agent for a completion
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Agent call timed out after {0:?}")]
    Timeout(Duration),

    #[error("No API key configured (set {0})")]
    MissingApiKey(String),

    #[error("Failed to spawn agent process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid agent response: {0}")]
    InvalidResponse(String),
}

/// Configuration for agent calls
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model to use (if the agent supports it)
    pub model: Option<String>,
    /// API key for hosted agents
    pub api_key: Option<String>,
    /// Override for the completion endpoint
    pub base_url: Option<String>,
    /// Optional timeout (None = no limit)
    pub timeout: Option<Duration>,
    /// Additional environment variables for command agents
    pub env_vars: HashMap<String, String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: None,
            timeout: None,
            env_vars: HashMap::new(),
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_env(mut self, key: String, value: String) -> Self {
        self.env_vars.insert(key, value);
        self
    }
}

/// A single completion request: an optional system message plus the user prompt
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 512,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Supported agent types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentType {
    OpenAi,
    Command,
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentType::OpenAi => write!(f, "openai"),
            AgentType::Command => write!(f, "command"),
        }
    }
}

impl std::str::FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "open-ai" | "gpt" => Ok(AgentType::OpenAi),
            "command" | "cmd" | "local" => Ok(AgentType::Command),
            _ => Err(format!("Unknown agent type: {}", s)),
        }
    }
}

/// The core abstraction for language model backends
#[async_trait]
pub trait Agent: Send + Sync {
    /// Human-readable name of the agent (e.g., "OpenAI")
    fn name(&self) -> &str;

    /// The agent type
    fn agent_type(&self) -> AgentType;

    /// Ask the agent for a completion
    async fn complete(
        &self,
        request: &CompletionRequest,
        config: &AgentConfig,
    ) -> Result<AgentOutput, AgentError>;

    /// Check if the agent can be reached with the given configuration
    async fn is_available(&self, config: &AgentConfig) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_type_from_str() {
        assert_eq!("openai".parse::<AgentType>().unwrap(), AgentType::OpenAi);
        assert_eq!("LOCAL".parse::<AgentType>().unwrap(), AgentType::Command);
        assert!("claude".parse::<AgentType>().is_err());
    }

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("hello")
            .with_system("be brief")
            .with_temperature(0.2)
            .with_max_tokens(50);
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.system.as_deref(), Some("be brief"));
        assert_eq!(request.max_tokens, 50);
    }
}
