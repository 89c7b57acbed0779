use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, warn};

use interviewloop_agent::{Agent, AgentConfig, CompletionRequest};

use crate::{InterviewerRoles, Question, QuestionError, QuestionPrompts, QuestionSource};

/// Wraps another source and has an agent phrase each question in the
/// interviewer persona of the domain.
///
/// Selection (and therefore exhaustion) is entirely the inner source's
/// business. If the agent fails, the raw question text is served instead.
pub struct LlmQuestionSource<'a, S> {
    inner: S,
    agent: &'a dyn Agent,
    config: AgentConfig,
    roles: InterviewerRoles,
}

impl<'a, S: QuestionSource> LlmQuestionSource<'a, S> {
    pub fn new(inner: S, agent: &'a dyn Agent, config: AgentConfig) -> Self {
        Self {
            inner,
            agent,
            config,
            roles: InterviewerRoles::default(),
        }
    }

    pub fn with_roles(mut self, roles: InterviewerRoles) -> Self {
        self.roles = roles;
        self
    }

    async fn phrase(&self, domain: &str, level: &str, question: &Question) -> Option<String> {
        let role = self.roles.role_for(domain);
        let prompt =
            match QuestionPrompts::build_question_prompt(role, domain, level, &question.text) {
                Ok(prompt) => prompt,
                Err(e) => {
                    warn!(error = %e, "Failed to build interviewer prompt");
                    return None;
                }
            };

        let request = CompletionRequest::new(prompt)
            .with_system(QuestionPrompts::system())
            .with_temperature(0.7)
            .with_max_tokens(150);

        match self.agent.complete(&request, &self.config).await {
            Ok(output) if !output.is_empty() => {
                debug!(
                    question_id = %question.id,
                    duration_secs = output.duration.as_secs_f64(),
                    "Question phrased by interviewer"
                );
                Some(output.trimmed().to_string())
            }
            Ok(_) => {
                warn!(question_id = %question.id, "Interviewer returned an empty question");
                None
            }
            Err(e) => {
                warn!(question_id = %question.id, error = %e, "Failed to phrase question");
                None
            }
        }
    }
}

#[async_trait]
impl<'a, S: QuestionSource> QuestionSource for LlmQuestionSource<'a, S> {
    async fn next(
        &self,
        domain: &str,
        level: &str,
        asked: &HashSet<String>,
    ) -> Result<Option<Question>, QuestionError> {
        let Some(question) = self.inner.next(domain, level, asked).await? else {
            return Ok(None);
        };

        match self.phrase(domain, level, &question).await {
            Some(text) => Ok(Some(Question::new(question.id, text))),
            None => Ok(Some(question)),
        }
    }
}
