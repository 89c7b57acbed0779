//! OpenAI-compatible chat completions agent.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};

use crate::{Agent, AgentConfig, AgentError, AgentOutput, AgentType, CompletionRequest};

/// Default chat completions endpoint
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Agent backed by an OpenAI-compatible HTTP API
pub struct OpenAiAgent {
    client: reqwest::Client,
}

impl OpenAiAgent {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(config: &AgentConfig) -> &str {
        config.base_url.as_deref().unwrap_or(OPENAI_API_URL)
    }

    /// Build the JSON request body
    pub(crate) fn build_request_body(
        request: &CompletionRequest,
        config: &AgentConfig,
    ) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(ref system) = request.system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": request.prompt }));

        serde_json::json!({
            "model": config.model.as_deref().unwrap_or(DEFAULT_MODEL),
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }

    /// Extract the first choice's message content from a response body
    pub(crate) fn parse_response(body: &str) -> Result<(String, Option<String>), AgentError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| AgentError::InvalidResponse(format!("malformed body: {}", e)))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AgentError::InvalidResponse("response had no content".into()))?;

        Ok((content, response.model))
    }
}

impl Default for OpenAiAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Agent for OpenAiAgent {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn agent_type(&self) -> AgentType {
        AgentType::OpenAi
    }

    async fn is_available(&self, config: &AgentConfig) -> bool {
        config
            .api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        config: &AgentConfig,
    ) -> Result<AgentOutput, AgentError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AgentError::MissingApiKey("OPENAI_API_KEY".into()))?;

        let body = Self::build_request_body(request, config);
        let start = Instant::now();

        debug!(
            agent = self.name(),
            endpoint = Self::endpoint(config),
            prompt_len = request.prompt.len(),
            "Requesting completion"
        );

        let mut builder = self
            .client
            .post(Self::endpoint(config))
            .bearer_auth(api_key)
            .json(&body);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| match config.timeout {
            Some(timeout) if e.is_timeout() => AgentError::Timeout(timeout),
            _ => AgentError::Http(e),
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion request rejected");
            return Err(AgentError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let (content, model) = Self::parse_response(&text)?;
        let duration = start.elapsed();

        debug!(
            duration_ms = duration.as_millis(),
            response_len = content.len(),
            "Completion received"
        );

        Ok(AgentOutput::new(content, model, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_includes_system_and_model() {
        let request = CompletionRequest::new("Ask about closures")
            .with_system("You are a technical interviewer.")
            .with_max_tokens(150);
        let config = AgentConfig::new().with_model("gpt-4o-mini");

        let body = OpenAiAgent::build_request_body(&request, &config);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 150);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Ask about closures");
    }

    #[test]
    fn test_request_body_defaults_model() {
        let body = OpenAiAgent::build_request_body(&CompletionRequest::new("hi"), &AgentConfig::new());
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_response_content() {
        let body = r#"{"model":"gpt-3.5-turbo","choices":[{"index":0,"message":{"role":"assistant","content":"What is a closure?"}}]}"#;
        let (content, model) = OpenAiAgent::parse_response(body).unwrap();
        assert_eq!(content, "What is a closure?");
        assert_eq!(model.as_deref(), Some("gpt-3.5-turbo"));
    }

    #[test]
    fn test_parse_response_without_choices() {
        let result = OpenAiAgent::parse_response(r#"{"choices":[]}"#);
        assert!(matches!(result, Err(AgentError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let agent = OpenAiAgent::new();
        let config = AgentConfig::new();
        assert!(!agent.is_available(&config).await);

        let result = agent.complete(&CompletionRequest::new("hi"), &config).await;
        assert!(matches!(result, Err(AgentError::MissingApiKey(_))));
    }
}
