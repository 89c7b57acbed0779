use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use crate::{Agent, AgentConfig, AgentError, AgentOutput, AgentType, CompletionRequest, ProcessSpawner};

/// Agent that runs a local model CLI, passing the prompt as the final argument
pub struct CommandAgent {
    binary_path: PathBuf,
    args: Vec<String>,
}

impl CommandAgent {
    pub fn new(binary_path: PathBuf, args: Vec<String>) -> Self {
        Self { binary_path, args }
    }

    /// Build from a full argv, e.g. `["ollama", "run", "llama3"]`
    pub fn from_argv(mut argv: Vec<String>) -> Self {
        if argv.is_empty() {
            return Self::default();
        }
        let binary = argv.remove(0);
        Self::new(PathBuf::from(binary), argv)
    }

    fn full_prompt(request: &CompletionRequest) -> String {
        match request.system {
            Some(ref system) => format!("{}\n\n{}", system, request.prompt),
            None => request.prompt.clone(),
        }
    }
}

impl Default for CommandAgent {
    fn default() -> Self {
        Self::new(
            PathBuf::from("ollama"),
            vec!["run".to_string(), "llama3".to_string()],
        )
    }
}

#[async_trait]
impl Agent for CommandAgent {
    fn name(&self) -> &str {
        "Local command"
    }

    fn agent_type(&self) -> AgentType {
        AgentType::Command
    }

    async fn is_available(&self, _config: &AgentConfig) -> bool {
        Command::new(&self.binary_path)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        config: &AgentConfig,
    ) -> Result<AgentOutput, AgentError> {
        let prompt = Self::full_prompt(request);

        debug!(
            agent = self.name(),
            binary = %self.binary_path.display(),
            prompt_len = prompt.len(),
            "Executing agent"
        );

        let mut args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        args.push(&prompt);

        let run = ProcessSpawner::spawn(&self.binary_path, &args, config);
        let output = match config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, run)
                .await
                .map_err(|_| AgentError::Timeout(timeout))??,
            None => run.await?,
        };

        if output.exit_code != 0 {
            return Err(AgentError::ExecutionFailed(format!(
                "{} exited with code {}: {}",
                self.binary_path.display(),
                output.exit_code,
                output.stderr.lines().last().unwrap_or_default()
            )));
        }

        Ok(AgentOutput::new(
            output.stdout,
            config.model.clone(),
            output.duration,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv_splits_binary() {
        let agent = CommandAgent::from_argv(vec!["ollama".into(), "run".into(), "phi3".into()]);
        assert_eq!(agent.binary_path, PathBuf::from("ollama"));
        assert_eq!(agent.args, vec!["run".to_string(), "phi3".to_string()]);
    }

    #[test]
    fn test_full_prompt_prepends_system() {
        let request = CompletionRequest::new("question").with_system("persona");
        assert_eq!(CommandAgent::full_prompt(&request), "persona\n\nquestion");
    }

    #[tokio::test]
    async fn test_echo_command_completes() {
        let agent = CommandAgent::from_argv(vec!["echo".into()]);
        let output = agent
            .complete(&CompletionRequest::new("hello there"), &AgentConfig::new())
            .await
            .unwrap();
        assert_eq!(output.trimmed(), "hello there");
    }

    #[tokio::test]
    async fn test_failing_command_is_an_error() {
        let agent = CommandAgent::from_argv(vec!["false".into()]);
        let result = agent
            .complete(&CompletionRequest::new("ignored"), &AgentConfig::new())
            .await;
        assert!(matches!(result, Err(AgentError::ExecutionFailed(_))));
    }
}
