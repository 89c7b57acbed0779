use std::sync::Arc;
use tracing::{debug, info, warn};

use interviewloop_analyzer::{AnswerContext, ResponseAnalyzer};
use interviewloop_logging::{LogEvent, Logger};
use interviewloop_questions::{Question, QuestionSource};

use crate::config::InterviewConfig;
use crate::error::InterviewError;
use crate::finalizer::SessionFinalizer;
use crate::outcome::{FinalReport, TurnOutcome};
use crate::session::{Session, SessionSnapshot, Turn};

const ANALYSIS_NOTICE: &str =
    "We could not analyze your last answer. It has been recorded, so let's keep going.";

/// Drives interview sessions through the question, answer and scoring loop.
///
/// The controller holds no per-session state, so one controller can serve
/// many sessions at once. Each call borrows its session mutably; work is
/// done on a staged copy that replaces the session only when the call
/// completes, so a dropped future leaves the session as it was.
pub struct SessionController<'a> {
    questions: &'a dyn QuestionSource,
    analyzer: &'a dyn ResponseAnalyzer,
    finalizer: SessionFinalizer<'a>,
    config: InterviewConfig,
    logger: Arc<Logger>,
}

impl<'a> SessionController<'a> {
    pub fn new(
        questions: &'a dyn QuestionSource,
        analyzer: &'a dyn ResponseAnalyzer,
        config: InterviewConfig,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            questions,
            analyzer,
            finalizer: SessionFinalizer::new(analyzer, logger.clone()),
            config,
            logger,
        }
    }

    pub fn config(&self) -> &InterviewConfig {
        &self.config
    }

    /// Open a session and ask its first question
    pub async fn start(&self, domain: &str, level: &str) -> Result<Session, InterviewError> {
        let mut session = Session::new(domain, level, self.config.answer_threshold);

        let question = self
            .next_question(&mut session)
            .await
            .map_err(|e| match e {
                InterviewError::Question(q) => InterviewError::at_start(q),
                other => other,
            })?;

        info!(
            session_id = %session.id,
            domain,
            level,
            threshold = session.answer_threshold,
            "Interview started"
        );
        self.logger.log(&LogEvent::SessionStarted {
            session_id: session.id.clone(),
            domain: domain.to_string(),
            level: level.to_string(),
            threshold: session.answer_threshold,
        });

        self.ask(&mut session, question, None);
        Ok(session)
    }

    /// Record an answer, then either ask the next question or score the session.
    ///
    /// If the question source fails while fetching the follow-up question,
    /// the call returns [`InterviewError::Question`] and the session is left
    /// exactly as it was before the call, answer included. The caller should
    /// submit the same answer again.
    pub async fn submit_answer(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<TurnOutcome, InterviewError> {
        if session.is_finished() {
            return Err(InterviewError::SessionClosed);
        }
        if session.awaiting_finalization() {
            return Err(InterviewError::FinalizationFailed(
                "all answers are in; retry finalization to score the interview".to_string(),
            ));
        }
        if text.trim().is_empty() {
            debug!(session_id = %session.id, "Ignoring blank answer");
            return Ok(TurnOutcome::Ignored);
        }

        let mut staged = session.clone();
        let answered = staged.candidate_turns() + 1;

        self.logger.log(&LogEvent::AnswerSubmitted {
            answer_number: answered,
            chars: text.chars().count(),
        });

        let (question_ref, question_text) = match &staged.current_question {
            Some(q) => (Some(q.id.clone()), q.text.clone()),
            None => (None, last_interviewer_text(&staged)),
        };
        let context = AnswerContext {
            question: &question_text,
            domain: &staged.domain,
            level: &staged.level,
        };

        let analysis = match self.analyzer.analyze_answer(text, &context).await {
            Ok(judgment) => {
                self.logger.log(&LogEvent::AnalysisCompleted {
                    answer_number: answered,
                    judgment: judgment.short_description(),
                });
                Some(judgment)
            }
            Err(e) => {
                warn!(error = %e, session_id = %staged.id, answered, "Answer analysis unavailable");
                self.logger.log(&LogEvent::AnalysisUnavailable {
                    answer_number: answered,
                    error: e.to_string(),
                });
                None
            }
        };

        let analyzed = analysis.is_some();
        let feedback = analysis.as_ref().and_then(|j| j.feedback.clone());
        staged
            .turns
            .push(Turn::answer(text, question_ref, analysis));
        staged.current_question = None;

        if staged.candidate_turns() >= staged.answer_threshold {
            let preamble = (!analyzed).then_some(ANALYSIS_NOTICE);
            let result = self
                .finalizer
                .finalize_with_preamble(&mut staged, preamble)
                .await;
            *session = staged;
            return result.map(TurnOutcome::Finished);
        }

        let question = self.next_question(&mut staged).await?;
        if analyzed {
            self.ask(&mut staged, question, feedback);
        } else {
            self.ask_after_notice(&mut staged, question);
        }

        *session = staged;
        Ok(TurnOutcome::NextQuestion { answered, analyzed })
    }

    /// Score a session whose answers are all in.
    ///
    /// Safe to call again after a [`InterviewError::FinalizationFailed`];
    /// each failed attempt leaves one more notice turn.
    pub async fn finalize(&self, session: &mut Session) -> Result<FinalReport, InterviewError> {
        if session.is_finished() {
            return Err(InterviewError::SessionClosed);
        }

        let mut staged = session.clone();
        let result = self.finalizer.finalize(&mut staged).await;
        *session = staged;
        result
    }

    pub fn snapshot(&self, session: &Session) -> SessionSnapshot {
        session.snapshot()
    }

    /// Fetch an unseen question, resetting the asked set once if the pool
    /// has run out.
    async fn next_question(&self, session: &mut Session) -> Result<Question, InterviewError> {
        if let Some(question) = self
            .questions
            .next(&session.domain, &session.level, &session.asked_question_ids)
            .await?
        {
            session.asked_question_ids.insert(question.id.clone());
            return Ok(question);
        }

        info!(
            domain = %session.domain,
            level = %session.level,
            asked = session.asked_question_ids.len(),
            "Question pool exhausted, resetting"
        );
        self.logger.log(&LogEvent::PoolReset {
            domain: session.domain.clone(),
            level: session.level.clone(),
        });
        session.asked_question_ids.clear();

        match self
            .questions
            .next(&session.domain, &session.level, &session.asked_question_ids)
            .await?
        {
            Some(question) => {
                session.asked_question_ids.insert(question.id.clone());
                Ok(question)
            }
            None => Err(InterviewError::Configuration(format!(
                "No questions available for {}/{}",
                session.domain, session.level
            ))),
        }
    }

    fn ask(&self, session: &mut Session, question: Question, feedback: Option<String>) {
        let text = match feedback {
            Some(feedback) => format!("{}\n\n{}", feedback, question.text),
            None => question.text.clone(),
        };
        self.log_question(session, &question);
        session.turns.push(Turn::question(question.id.clone(), text));
        session.current_question = Some(question);
    }

    /// The notice and the next question share one interviewer turn
    fn ask_after_notice(&self, session: &mut Session, question: Question) {
        let text = format!("{}\n\n{}", ANALYSIS_NOTICE, question.text);
        self.log_question(session, &question);
        session
            .turns
            .push(Turn::notice(text, Some(question.id.clone())));
        session.current_question = Some(question);
    }

    fn log_question(&self, session: &Session, question: &Question) {
        self.logger.log(&LogEvent::QuestionAsked {
            answer_number: session.candidate_turns() + 1,
            question_id: question.id.clone(),
        });
    }
}

fn last_interviewer_text(session: &Session) -> String {
    session
        .turns
        .iter()
        .rev()
        .find(|t| !t.is_candidate())
        .map(|t| t.text.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use interviewloop_analyzer::{
        AnalysisError, Classification, Judgment, TranscriptContext,
    };
    use interviewloop_questions::{BankQuestionSource, QuestionBank};

    struct FeedbackAnalyzer;

    #[async_trait]
    impl ResponseAnalyzer for FeedbackAnalyzer {
        async fn analyze_answer(
            &self,
            _answer: &str,
            _context: &AnswerContext<'_>,
        ) -> Result<Judgment, AnalysisError> {
            let mut judgment = Judgment::new(0.8, Classification::Human).with_accuracy(0.5);
            judgment.feedback = Some("Good start.".to_string());
            Ok(judgment)
        }

        async fn analyze_transcript(
            &self,
            _transcript: &str,
            _context: &TranscriptContext<'_>,
        ) -> Result<Judgment, AnalysisError> {
            Ok(Judgment::new(0.8, Classification::Human))
        }
    }

    fn source() -> BankQuestionSource {
        let mut bank = QuestionBank::new();
        bank.add_level("Rust", "beginner", ["What is ownership?", "What is a slice?"]);
        BankQuestionSource::new(bank)
    }

    #[tokio::test]
    async fn test_feedback_prefixes_next_question() {
        let questions = source();
        let analyzer = FeedbackAnalyzer;
        let controller = SessionController::new(
            &questions,
            &analyzer,
            InterviewConfig::default(),
            Arc::new(Logger::silent()),
        );

        let mut session = controller.start("Rust", "beginner").await.unwrap();
        let first_ref = session.turns()[0].question_ref.clone();
        controller
            .submit_answer(&mut session, "Each value has one owner")
            .await
            .unwrap();

        let turns = session.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].question_ref, first_ref);
        assert!(turns[2].text.starts_with("Good start.\n\n"));
        assert_eq!(session.current_question().map(|q| &q.id), turns[2].question_ref.as_ref());
    }

    #[tokio::test]
    async fn test_finalize_before_threshold_is_not_due() {
        let questions = source();
        let analyzer = FeedbackAnalyzer;
        let controller = SessionController::new(
            &questions,
            &analyzer,
            InterviewConfig::new().with_answer_threshold(2),
            Arc::new(Logger::silent()),
        );

        let mut session = controller.start("Rust", "beginner").await.unwrap();
        let err = controller.finalize(&mut session).await.unwrap_err();
        assert!(matches!(
            err,
            InterviewError::FinalizationNotDue {
                answered: 0,
                threshold: 2
            }
        ));
        assert_eq!(session.turns().len(), 1);
    }
}
