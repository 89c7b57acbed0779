use std::collections::HashSet;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use interviewloop_agent::{
    Agent, AgentConfig, AgentError, AgentOutput, AgentType, CompletionRequest,
};
use interviewloop_questions::{
    BankQuestionSource, InterviewerRoles, LlmQuestionSource, QuestionBank, QuestionError,
    QuestionSource,
};
use tempfile::TempDir;

fn two_question_source() -> BankQuestionSource {
    let mut bank = QuestionBank::new();
    bank.add_level(
        "JavaScript",
        "beginner",
        ["What is hoisting?", "Explain closures"],
    );
    BankQuestionSource::new(bank)
}

/// Agent that always answers with a fixed text, or always fails.
struct ScriptedAgent {
    reply: Option<&'static str>,
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        "scripted"
    }

    fn agent_type(&self) -> AgentType {
        AgentType::Command
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        _config: &AgentConfig,
    ) -> Result<AgentOutput, AgentError> {
        assert!(request.prompt.contains("CURRENT QUESTION"));
        match self.reply {
            Some(text) => Ok(AgentOutput::new(text.to_string(), None, Duration::ZERO)),
            None => Err(AgentError::ExecutionFailed("offline".into())),
        }
    }

    async fn is_available(&self, _config: &AgentConfig) -> bool {
        true
    }
}

/// Agent that keeps every prompt it is sent and echoes a fixed reply.
#[derive(Default)]
struct RecordingAgent {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl Agent for RecordingAgent {
    fn name(&self) -> &str {
        "recording"
    }

    fn agent_type(&self) -> AgentType {
        AgentType::Command
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        _config: &AgentConfig,
    ) -> Result<AgentOutput, AgentError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        Ok(AgentOutput::new("Tell me about it.".to_string(), None, Duration::ZERO))
    }

    async fn is_available(&self, _config: &AgentConfig) -> bool {
        true
    }
}

// ============================================================
// Bank source tests
// ============================================================

#[tokio::test]
async fn test_builtin_bank_serves_every_listed_domain() {
    let source = BankQuestionSource::new(QuestionBank::builtin());
    let asked = HashSet::new();

    for domain in ["JavaScript", "React", "Python", "Node.js", "AI/ML", "DevOps", "Cybersecurity"] {
        for level in ["beginner", "intermediate", "advanced"] {
            let question = source.next(domain, level, &asked).await.unwrap().unwrap();
            assert!(
                question.id.starts_with(&format!("{}/{}/", domain, level)),
                "{}",
                question.id
            );
        }
    }
}

#[tokio::test]
async fn test_bank_source_never_repeats_until_exhausted() {
    let source = two_question_source();
    let mut asked = HashSet::new();

    let first = source.next("JavaScript", "beginner", &asked).await.unwrap().unwrap();
    asked.insert(first.id.clone());
    let second = source.next("JavaScript", "beginner", &asked).await.unwrap().unwrap();
    asked.insert(second.id.clone());

    assert_ne!(first.id, second.id);

    let third = source.next("JavaScript", "beginner", &asked).await.unwrap();
    assert!(third.is_none(), "exhausted pool signals None");

    asked.clear();
    assert!(source.next("JavaScript", "beginner", &asked).await.unwrap().is_some());
}

#[tokio::test]
async fn test_bank_source_unknown_domain_and_level() {
    let source = two_question_source();
    let asked = HashSet::new();

    let err = source.next("Go", "beginner", &asked).await.unwrap_err();
    assert_eq!(err, QuestionError::UnknownDomain("Go".into()));

    let err = source.next("JavaScript", "wizard", &asked).await.unwrap_err();
    assert!(matches!(err, QuestionError::UnknownLevel { .. }));
}

#[tokio::test]
async fn test_bank_source_empty_pool_is_an_error() {
    let mut bank = QuestionBank::new();
    bank.add_level("Rust", "beginner", Vec::<String>::new());
    let source = BankQuestionSource::new(bank);

    let err = source.next("Rust", "beginner", &HashSet::new()).await.unwrap_err();
    assert!(matches!(err, QuestionError::Empty { .. }));
}

// ============================================================
// Bank loading tests
// ============================================================

#[test]
fn test_load_dir_reads_json_banks() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("python-questions.json"),
        r#"{"domain":"Python","levels":{"beginner":["What is a list comprehension?"],"advanced":["Explain the GIL","What are metaclasses?"]}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let bank = QuestionBank::load_dir(dir.path()).unwrap();

    assert_eq!(bank.domains(), vec!["Python"]);
    assert_eq!(bank.levels("Python"), vec!["advanced", "beginner"]);
    assert_eq!(bank.pool("Python", "advanced").unwrap()[1].id, "Python/advanced/1");
}

#[test]
fn test_load_dir_reports_malformed_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.json"), "{not json").unwrap();

    let result = QuestionBank::load_dir(dir.path());
    assert!(result.is_err());
}

// ============================================================
// Interviewer phrasing tests
// ============================================================

#[tokio::test]
async fn test_llm_source_phrases_question_and_keeps_id() {
    let agent = ScriptedAgent {
        reply: Some("  As a Senior JavaScript Developer, tell me about hoisting.  "),
    };
    let source = LlmQuestionSource::new(two_question_source(), &agent, AgentConfig::new());

    let question = source
        .next("JavaScript", "beginner", &HashSet::new())
        .await
        .unwrap()
        .unwrap();

    assert!(question.id.starts_with("JavaScript/beginner/"));
    assert_eq!(
        question.text,
        "As a Senior JavaScript Developer, tell me about hoisting."
    );
}

#[tokio::test]
async fn test_llm_source_falls_back_to_bank_text() {
    let agent = ScriptedAgent { reply: None };
    let source = LlmQuestionSource::new(two_question_source(), &agent, AgentConfig::new());

    let question = source
        .next("JavaScript", "beginner", &HashSet::new())
        .await
        .unwrap()
        .unwrap();

    assert!(["What is hoisting?", "Explain closures"].contains(&question.text.as_str()));
}

#[tokio::test]
async fn test_llm_source_passes_exhaustion_through() {
    let agent = ScriptedAgent { reply: Some("unused") };
    let source = LlmQuestionSource::new(two_question_source(), &agent, AgentConfig::new());
    let asked: HashSet<String> = ["JavaScript/beginner/0", "JavaScript/beginner/1"]
        .into_iter()
        .map(String::from)
        .collect();

    assert!(source.next("JavaScript", "beginner", &asked).await.unwrap().is_none());
}

#[tokio::test]
async fn test_llm_source_uses_configured_persona() {
    let agent = RecordingAgent::default();
    let roles = InterviewerRoles::default().with_role("JavaScript", "Staff Engineer at a browser vendor");
    let source = LlmQuestionSource::new(two_question_source(), &agent, AgentConfig::new())
        .with_roles(roles);

    source
        .next("JavaScript", "beginner", &HashSet::new())
        .await
        .unwrap()
        .unwrap();

    let prompts = agent.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Staff Engineer at a browser vendor"));
}
