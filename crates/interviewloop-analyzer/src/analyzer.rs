use async_trait::async_trait;
use tracing::{debug, info};

use interviewloop_agent::{Agent, AgentConfig, CompletionRequest, TemplateError};

use crate::{AnalyzerPrompts, Judgment, JudgmentParseError};

/// Context for analyzing one answer
#[derive(Debug, Clone, Copy)]
pub struct AnswerContext<'a> {
    pub question: &'a str,
    pub domain: &'a str,
    pub level: &'a str,
}

/// Context for analyzing a whole transcript
#[derive(Debug, Clone, Copy)]
pub struct TranscriptContext<'a> {
    pub domain: &'a str,
    pub level: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Agent execution error: {0}")]
    AgentError(String),

    #[error("Failed to parse analyzer judgment: {0}")]
    ParseError(#[from] JudgmentParseError),

    #[error(transparent)]
    TemplateError(#[from] TemplateError),
}

/// Judges answers and transcripts.
///
/// Callers treat every error the same way: analysis is unavailable.
#[async_trait]
pub trait ResponseAnalyzer: Send + Sync {
    async fn analyze_answer(
        &self,
        answer: &str,
        context: &AnswerContext<'_>,
    ) -> Result<Judgment, AnalysisError>;

    async fn analyze_transcript(
        &self,
        transcript: &str,
        context: &TranscriptContext<'_>,
    ) -> Result<Judgment, AnalysisError>;
}

/// Analyzer that asks a language model agent for a JSON judgment
pub struct LlmAnalyzer<'a> {
    agent: &'a dyn Agent,
    config: AgentConfig,
}

impl<'a> LlmAnalyzer<'a> {
    pub fn new(agent: &'a dyn Agent, config: AgentConfig) -> Self {
        Self { agent, config }
    }

    async fn judge(&self, prompt: String, max_tokens: u32) -> Result<Judgment, AnalysisError> {
        let request = CompletionRequest::new(prompt)
            .with_system(AnalyzerPrompts::system())
            .with_temperature(0.2)
            .with_max_tokens(max_tokens);

        debug!(
            prompt_len = request.prompt.len(),
            agent = self.agent.name(),
            "Running analysis"
        );

        let output = self
            .agent
            .complete(&request, &self.config)
            .await
            .map_err(|e| AnalysisError::AgentError(e.to_string()))?;

        info!(
            duration_secs = output.duration.as_secs_f64(),
            "Analyzer completed"
        );

        Ok(Judgment::parse(&output.text)?)
    }
}

#[async_trait]
impl<'a> ResponseAnalyzer for LlmAnalyzer<'a> {
    async fn analyze_answer(
        &self,
        answer: &str,
        context: &AnswerContext<'_>,
    ) -> Result<Judgment, AnalysisError> {
        let prompt = AnalyzerPrompts::build_answer_prompt(
            answer,
            context.question,
            context.domain,
            context.level,
        )?;
        self.judge(prompt, 400).await
    }

    async fn analyze_transcript(
        &self,
        transcript: &str,
        context: &TranscriptContext<'_>,
    ) -> Result<Judgment, AnalysisError> {
        let prompt =
            AnalyzerPrompts::build_transcript_prompt(transcript, context.domain, context.level)?;
        self.judge(prompt, 600).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Classification;
    use interviewloop_agent::{AgentError, AgentOutput, AgentType};
    use std::time::Duration;

    struct FixedAgent(Result<&'static str, &'static str>);

    #[async_trait]
    impl Agent for FixedAgent {
        fn name(&self) -> &str {
            "fixed"
        }

        fn agent_type(&self) -> AgentType {
            AgentType::Command
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
            _config: &AgentConfig,
        ) -> Result<AgentOutput, AgentError> {
            match self.0 {
                Ok(text) => Ok(AgentOutput::new(text.to_string(), None, Duration::ZERO)),
                Err(msg) => Err(AgentError::ExecutionFailed(msg.to_string())),
            }
        }

        async fn is_available(&self, _config: &AgentConfig) -> bool {
            true
        }
    }

    const CONTEXT: AnswerContext<'static> = AnswerContext {
        question: "What is a closure?",
        domain: "JavaScript",
        level: "beginner",
    };

    #[tokio::test]
    async fn test_analyze_answer_parses_agent_reply() {
        let agent = FixedAgent(Ok(
            r#"{"confidence": 0.9, "classification": "human", "accuracy": 0.7, "reasoning": "ok"}"#,
        ));
        let analyzer = LlmAnalyzer::new(&agent, AgentConfig::new());

        let judgment = analyzer
            .analyze_answer("closures are scoped functions", &CONTEXT)
            .await
            .unwrap();
        assert_eq!(judgment.classification, Classification::Human);
        assert_eq!(judgment.accuracy, Some(0.7));
    }

    #[tokio::test]
    async fn test_agent_failure_is_analysis_error() {
        let agent = FixedAgent(Err("network down"));
        let analyzer = LlmAnalyzer::new(&agent, AgentConfig::new());

        let result = analyzer.analyze_answer("anything", &CONTEXT).await;
        assert!(matches!(result, Err(AnalysisError::AgentError(_))));
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_analysis_error() {
        let agent = FixedAgent(Ok("I think this is human."));
        let analyzer = LlmAnalyzer::new(&agent, AgentConfig::new());

        let context = TranscriptContext {
            domain: "JavaScript",
            level: "beginner",
        };
        let result = analyzer
            .analyze_transcript("Interviewer: hi\nCandidate: hello", &context)
            .await;
        assert!(matches!(result, Err(AnalysisError::ParseError(_))));
    }
}
