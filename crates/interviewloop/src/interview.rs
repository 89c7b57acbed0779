//! The interactive `start` command.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use tracing::warn;

use interviewloop_agent::{create_agent, Agent, AgentConfig, AgentType};
use interviewloop_analyzer::LlmAnalyzer;
use interviewloop_core::{
    FinalReport, InterviewConfig, InterviewError, RewardPolicy, Session, SessionController,
    Speaker, Turn, TurnKind, TurnOutcome, DEFAULT_ANSWER_THRESHOLD,
};
use interviewloop_db::{Database, InterviewRecord};
use interviewloop_logging::{LogFormat, Logger, TranscriptWriter};
use interviewloop_questions::{
    BankQuestionSource, InterviewerRoles, LlmQuestionSource, QuestionBank, QuestionError,
    QuestionSource,
};

use crate::config::ProjectConfig;
use crate::{StartArgs, DEFAULT_USER};

/// Question bank from a directory of JSON files, or the built-in bank
pub fn load_bank(dir: Option<&Path>) -> Result<QuestionBank> {
    let bank = match dir {
        Some(dir) => QuestionBank::load_dir(dir)
            .with_context(|| format!("Failed to load questions from {}", dir.display()))?,
        None => QuestionBank::builtin(),
    };

    if bank.is_empty() {
        anyhow::bail!("The question bank is empty");
    }
    Ok(bank)
}

/// Agent type, model and connection settings for one role
struct RoleSetup {
    agent: Box<dyn Agent>,
    config: AgentConfig,
}

fn role_setup(
    flag_agent: Option<AgentType>,
    config_agent: Option<&str>,
    model: Option<&str>,
    config: &ProjectConfig,
) -> Result<RoleSetup> {
    let agent_type = match flag_agent {
        Some(agent_type) => agent_type,
        None => config_agent
            .map(str::parse::<AgentType>)
            .transpose()
            .map_err(|e| anyhow::anyhow!(e))?
            .unwrap_or(AgentType::OpenAi),
    };

    let mut agent_config = AgentConfig::new();
    if let Some(model) = model {
        agent_config = agent_config.with_model(model);
    }
    if let Ok(key) = std::env::var(config.api_key_env()) {
        agent_config = agent_config.with_api_key(key);
    }
    if let Some(ref url) = config.base_url {
        agent_config = agent_config.with_base_url(url.clone());
    }
    if let Some(timeout) = config.timeout() {
        agent_config = agent_config.with_timeout(timeout);
    }
    for (key, value) in &config.command_env {
        agent_config = agent_config.with_env(key.clone(), value.clone());
    }

    Ok(RoleSetup {
        agent: create_agent(agent_type, config.command.clone()),
        config: agent_config,
    })
}

/// Built-in personas with the `[personas]` table laid over them
fn interviewer_roles(config: &ProjectConfig) -> InterviewerRoles {
    config
        .personas
        .iter()
        .fold(InterviewerRoles::default(), |roles, (domain, role)| {
            roles.with_role(domain.clone(), role.clone())
        })
}

/// Progress logger, optionally mirrored to a JSONL file
fn build_logger(format: LogFormat, log_file: Option<&Path>) -> Result<Logger> {
    match log_file {
        Some(path) => Logger::with_file(format, path)
            .with_context(|| format!("Failed to open log file {}", path.display())),
        None => Ok(Logger::new(format)),
    }
}

/// Level from the flag, or a prompt over the domain's levels.
///
/// An unknown domain is reported the same way the controller reports it,
/// rather than prompting over an empty list.
fn resolve_level(bank: &QuestionBank, domain: &str, level: Option<String>) -> Result<String> {
    if let Some(level) = level {
        return Ok(level);
    }

    let levels = bank.levels(domain);
    if levels.is_empty() {
        let error = QuestionError::UnknownDomain(domain.to_string());
        return Err(InterviewError::Configuration(error.to_string()))
            .context("Failed to start the interview");
    }
    choose("Select a level", &levels)
}

fn choose(prompt: &str, items: &[&str]) -> Result<String> {
    if items.len() == 1 {
        return Ok(items[0].to_string());
    }
    let selection = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;
    Ok(items[selection].to_string())
}

/// Run one interview to completion. Returns the process exit code.
pub async fn run_interview(args: StartArgs, config: &ProjectConfig) -> Result<i32> {
    let questions_dir = args.questions_dir.clone().or_else(|| config.questions_dir.clone());
    let bank = load_bank(questions_dir.as_deref())?;

    let domain = match args.domain.clone() {
        Some(domain) => domain,
        None => choose("Select a domain", &bank.domains())?,
    };
    let level = resolve_level(&bank, &domain, args.level.clone())?;

    let threshold = args
        .threshold
        .or(config.threshold)
        .unwrap_or(DEFAULT_ANSWER_THRESHOLD);
    let user = args
        .user
        .clone()
        .or_else(|| config.user.clone())
        .unwrap_or_else(|| DEFAULT_USER.to_string());

    let flag_agent = args.agent.map(AgentType::from);
    let interviewer = role_setup(
        flag_agent,
        config.interviewer_agent(),
        args.model.as_deref().or(config.interviewer_model()),
        config,
    )?;
    let analyzer_role = role_setup(
        flag_agent,
        config.analyzer_agent(),
        args.model.as_deref().or(config.analyzer_model()),
        config,
    )?;

    if !analyzer_role.agent.is_available(&analyzer_role.config).await {
        anyhow::bail!(
            "Analyzer agent '{}' is not available. Set {} or configure a command agent.",
            analyzer_role.agent.name(),
            config.api_key_env()
        );
    }

    let bank_source = BankQuestionSource::new(bank);
    let questions: Box<dyn QuestionSource + '_> =
        if interviewer.agent.is_available(&interviewer.config).await {
            Box::new(
                LlmQuestionSource::new(
                    bank_source,
                    interviewer.agent.as_ref(),
                    interviewer.config.clone(),
                )
                .with_roles(interviewer_roles(config)),
            )
        } else {
            warn!(
                agent = interviewer.agent.name(),
                "Interviewer agent unavailable, asking bank questions verbatim"
            );
            Box::new(bank_source)
        };
    let analyzer = LlmAnalyzer::new(analyzer_role.agent.as_ref(), analyzer_role.config.clone());

    let log_format: LogFormat = args.log_format.map(LogFormat::from).unwrap_or_default();
    let log_file = args.log_file.clone().or_else(|| config.log_file.clone());
    let logger = Arc::new(build_logger(log_format, log_file.as_deref())?);
    let controller = SessionController::new(
        questions.as_ref(),
        &analyzer,
        InterviewConfig::new().with_answer_threshold(threshold),
        logger,
    );

    let db = Database::open().context("Failed to open database")?;
    db.wallets().init(&user)?;

    let mut session = controller
        .start(&domain, &level)
        .await
        .context("Failed to start the interview")?;

    let echo = Echo::for_output(args.json_output);
    let mut recorder = Recorder::new(&db, &session, &user, echo);
    recorder.transcript_start(
        &session,
        interviewer.agent.name(),
        analyzer_role.agent.name(),
    );
    recorder.record(&session, None)?;

    let report = loop {
        let answer: String = Input::new()
            .with_prompt("Your answer")
            .allow_empty(true)
            .interact_text()?;

        match controller.submit_answer(&mut session, &answer).await {
            Ok(TurnOutcome::Ignored) => {
                eprintln!("{}", "Please type an answer.".dimmed());
            }
            Ok(TurnOutcome::NextQuestion { .. }) => {
                recorder.record(&session, None)?;
            }
            Ok(TurnOutcome::Finished(report)) => break Some(report),
            Err(InterviewError::Question(e)) => {
                // the session is untouched, so the same answer can be sent again
                warn!(error = %e, "Next question unavailable");
                eprintln!(
                    "{} Could not load the next question ({}). Please submit your answer again.",
                    "⚠".bright_yellow(),
                    e
                );
            }
            Err(e) if e.is_retryable() => {
                recorder.record(&session, None)?;
                break retry_finalization(&controller, &mut session, &mut recorder).await?;
            }
            Err(e) => return Err(e).context("Interview failed"),
        }
    };

    let Some(report) = report else {
        recorder.finish(&session, None, None);
        eprintln!(
            "{} Interview saved without a score.",
            "⚠".bright_yellow()
        );
        return Ok(1);
    };

    let coins = report.coins_with(&config.reward_policy());
    recorder.record(&session, Some(coins))?;
    recorder.finish(&session, Some(&report), Some(coins));

    let balance = if coins > 0 {
        db.wallets().add(&user, coins as i64)?
    } else {
        db.wallets().balance(&user)?.unwrap_or(0)
    };

    if args.json_output {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    } else {
        print_reward(&report, coins, balance, &config.reward_policy());
    }

    Ok(0)
}

/// Offer finalization retries until it succeeds or the user gives up
async fn retry_finalization(
    controller: &SessionController<'_>,
    session: &mut Session,
    recorder: &mut Recorder<'_>,
) -> Result<Option<FinalReport>> {
    loop {
        let retry = Confirm::new()
            .with_prompt("Scoring failed. Try again?")
            .default(true)
            .interact()?;
        if !retry {
            return Ok(None);
        }

        match controller.finalize(session).await {
            Ok(report) => return Ok(Some(report)),
            Err(InterviewError::FinalizationFailed(_)) => {
                recorder.record(session, None)?;
            }
            Err(e) => return Err(e).context("Finalization failed"),
        }
    }
}

/// Mirrors a session into the database and the JSONL transcript, and echoes
/// new turns to the terminal.
struct Recorder<'a> {
    db: &'a Database,
    transcript: Option<TranscriptWriter>,
    user_id: String,
    written: usize,
    echo: Echo,
}

impl<'a> Recorder<'a> {
    fn new(db: &'a Database, session: &Session, user_id: &str, echo: Echo) -> Self {
        let transcript = match TranscriptWriter::new(session.id()) {
            Ok(writer) => Some(writer),
            Err(e) => {
                warn!(error = %e, "Could not create transcript file");
                None
            }
        };

        Self {
            db,
            transcript,
            user_id: user_id.to_string(),
            written: 0,
            echo,
        }
    }

    fn transcript_start(&self, session: &Session, interviewer: &str, analyzer: &str) {
        if let Some(ref writer) = self.transcript {
            writer.write_start(
                session.id(),
                session.domain(),
                session.level(),
                session.answer_threshold(),
                interviewer,
                analyzer,
            );
        }
    }

    /// Write turns added since the last call and upsert the interview row
    fn record(&mut self, session: &Session, coins: Option<u64>) -> Result<()> {
        for (index, turn) in session.turns().iter().enumerate().skip(self.written) {
            if let Some(ref writer) = self.transcript {
                writer.write_turn(index, turn);
            }
            if let Some(text) = format_turn(turn) {
                self.echo.print(&text);
            }
        }
        self.written = session.turns().len();

        let snapshot = session.snapshot();
        let record = InterviewRecord {
            id: snapshot.id.clone(),
            user_id: self.user_id.clone(),
            domain: snapshot.domain.clone(),
            level: snapshot.level.clone(),
            status: snapshot.status.to_string(),
            authenticity_score: snapshot.final_score,
            technical_accuracy: snapshot.technical_accuracy,
            classification: snapshot
                .final_verdict
                .as_ref()
                .map(|v| v.classification.to_string()),
            coins_awarded: coins.map(|c| c as i64),
            transcript: serde_json::to_string(&snapshot)?,
            started_at: snapshot.started_at,
            ended_at: snapshot.finished_at,
        };
        self.db
            .interviews()
            .save(&record)
            .context("Failed to save interview")?;
        Ok(())
    }

    fn finish(&self, session: &Session, report: Option<&FinalReport>, coins: Option<u64>) {
        let Some(ref writer) = self.transcript else {
            return;
        };
        let duration = (Utc::now() - session.started_at())
            .to_std()
            .unwrap_or_default()
            .as_secs_f64();
        let classification = report.map(|r| r.classification().to_string());
        writer.write_end(
            &session.status().to_string(),
            session.candidate_turns(),
            report.map(|r| r.authenticity_score),
            report.map(|r| r.technical_accuracy),
            classification.as_deref(),
            coins,
            duration,
        );
        eprintln!(
            "{}",
            format!("Transcript: {}", writer.path().display()).dimmed()
        );
    }
}

/// Where interviewer turns are echoed. With `--json-output` stdout carries
/// only the final JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    Stdout,
    Stderr,
}

impl Echo {
    fn for_output(json_output: bool) -> Self {
        if json_output {
            Echo::Stderr
        } else {
            Echo::Stdout
        }
    }

    fn print(self, text: &str) {
        match self {
            Echo::Stdout => println!("{}", text),
            Echo::Stderr => eprintln!("{}", text),
        }
    }
}

/// Terminal rendering of an interviewer turn; candidate turns are not echoed
fn format_turn(turn: &Turn) -> Option<String> {
    match (turn.speaker, turn.kind) {
        (Speaker::Candidate, _) => None,
        (_, TurnKind::Summary) => Some(format!("\n{}\n", turn.text.bright_white().bold())),
        (_, TurnKind::Notice) => Some(format!(
            "{} {}\n",
            "Interviewer:".bright_yellow().bold(),
            turn.text
        )),
        _ => Some(format!(
            "{} {}\n",
            "Interviewer:".bright_blue().bold(),
            turn.text
        )),
    }
}

fn print_reward(report: &FinalReport, coins: u64, balance: i64, policy: &RewardPolicy) {
    if coins > 0 {
        eprintln!(
            "{} Earned {} coins (balance: {})",
            "✓".bright_green(),
            coins.to_string().bold(),
            balance
        );
    } else if report.authenticity_score < policy.min_authenticity {
        eprintln!(
            "{} No coins earned: an authenticity score of {} is needed (balance: {})",
            "→".bright_yellow(),
            policy.min_authenticity,
            balance
        );
    } else {
        eprintln!("{} No coins earned (balance: {})", "→".dimmed(), balance);
    }
    eprintln!(
        "{}",
        format!("Duration: {}", format_duration(report.total_duration_secs)).dimmed()
    );
}

pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.0}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining_secs = (secs % 60.0) as u64;
        format!("{}m {}s", mins, remaining_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_builtin_bank() {
        let bank = load_bank(None).unwrap();
        assert!(bank.has_domain("JavaScript"));
    }

    #[test]
    fn test_load_empty_dir_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_bank(Some(dir.path())).is_err());
    }

    #[test]
    fn test_role_setup_prefers_flag() {
        let config = ProjectConfig {
            agent: Some("openai".to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        };
        let setup = role_setup(Some(AgentType::Command), config.analyzer_agent(), None, &config)
            .unwrap();
        assert_eq!(setup.agent.agent_type(), AgentType::Command);
        assert_eq!(setup.config.timeout, Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn test_role_setup_rejects_unknown_agent() {
        let config = ProjectConfig {
            agent: Some("claude".to_string()),
            ..Default::default()
        };
        assert!(role_setup(None, config.interviewer_agent(), None, &config).is_err());
    }

    #[test]
    fn test_json_output_keeps_turns_off_stdout() {
        assert_eq!(Echo::for_output(true), Echo::Stderr);
        assert_eq!(Echo::for_output(false), Echo::Stdout);
    }

    #[test]
    fn test_format_turn_skips_candidate() {
        colored::control::set_override(false);
        let question = Turn::question("Python/beginner/0", "What is a tuple?");
        assert_eq!(
            format_turn(&question).as_deref(),
            Some("Interviewer: What is a tuple?\n")
        );

        let answer = Turn::answer("An immutable list", None, None);
        assert!(format_turn(&answer).is_none());
    }

    #[test]
    fn test_unknown_domain_fails_before_level_prompt() {
        let bank = load_bank(None).unwrap();
        let err = resolve_level(&bank, "COBOL", None).unwrap_err();
        let cause = err.downcast_ref::<InterviewError>().unwrap();
        assert!(matches!(cause, InterviewError::Configuration(msg) if msg.contains("COBOL")));
    }

    #[test]
    fn test_level_flag_skips_prompt() {
        let bank = load_bank(None).unwrap();
        let level = resolve_level(&bank, "Python", Some("advanced".to_string())).unwrap();
        assert_eq!(level, "advanced");
    }

    #[test]
    fn test_log_file_receives_events() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.jsonl");
        let logger = build_logger(LogFormat::Compact, Some(&path)).unwrap();
        logger.log(&interviewloop_logging::LogEvent::FinalizationStarted { answers: 3 });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"finalization_started\""));
    }

    #[test]
    fn test_personas_override_builtin_roles() {
        let mut config = ProjectConfig::default();
        config
            .personas
            .insert("Python".to_string(), "Core developer of CPython".to_string());

        let roles = interviewer_roles(&config);
        assert_eq!(roles.role_for("Python"), "Core developer of CPython");
        assert_eq!(roles.role_for("DevOps"), "Site Reliability Engineer at AWS");
    }

    #[test]
    fn test_command_env_reaches_agent_config() {
        let mut config = ProjectConfig::default();
        config
            .command_env
            .insert("OLLAMA_HOST".to_string(), "127.0.0.1:11500".to_string());

        let setup = role_setup(Some(AgentType::Command), None, None, &config).unwrap();
        assert_eq!(
            setup.config.env_vars.get("OLLAMA_HOST").map(String::as_str),
            Some("127.0.0.1:11500")
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.4), "42s");
        assert_eq!(format_duration(125.0), "2m 5s");
    }
}
