use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use interviewloop_analyzer::Judgment;
use interviewloop_questions::Question;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

impl Speaker {
    /// Transcript line prefix
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Interviewer => "Interviewer",
            Speaker::Candidate => "Candidate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Question,
    Answer,
    /// Interviewer turn reporting a recovered failure
    Notice,
    /// Final verdict of a finished session
    Summary,
}

/// One message in the interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub kind: TurnKind,
    pub text: String,
    /// Id of the question asked, or of the question being answered
    pub question_ref: Option<String>,
    /// Only set on candidate turns whose analysis succeeded
    pub analysis: Option<Judgment>,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    fn interviewer(kind: TurnKind, text: String, question_ref: Option<String>) -> Self {
        Self {
            speaker: Speaker::Interviewer,
            kind,
            text,
            question_ref,
            analysis: None,
            timestamp: Utc::now(),
        }
    }

    pub fn question(question_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::interviewer(TurnKind::Question, text.into(), Some(question_id.into()))
    }

    pub fn notice(text: impl Into<String>, question_ref: Option<String>) -> Self {
        Self::interviewer(TurnKind::Notice, text.into(), question_ref)
    }

    pub fn summary(text: impl Into<String>) -> Self {
        Self::interviewer(TurnKind::Summary, text.into(), None)
    }

    pub fn answer(
        text: impl Into<String>,
        question_ref: Option<String>,
        analysis: Option<Judgment>,
    ) -> Self {
        Self {
            speaker: Speaker::Candidate,
            kind: TurnKind::Answer,
            text: text.into(),
            question_ref,
            analysis,
            timestamp: Utc::now(),
        }
    }

    pub fn is_candidate(&self) -> bool {
        self.speaker == Speaker::Candidate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Finished,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::InProgress => write!(f, "in_progress"),
            SessionStatus::Finished => write!(f, "finished"),
        }
    }
}

/// One interview attempt.
///
/// Only the controller mutates a session; callers read it through the
/// accessors or a [`SessionSnapshot`].
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: String,
    pub(crate) domain: String,
    pub(crate) level: String,
    pub(crate) answer_threshold: usize,
    pub(crate) turns: Vec<Turn>,
    pub(crate) asked_question_ids: HashSet<String>,
    pub(crate) current_question: Option<Question>,
    pub(crate) status: SessionStatus,
    pub(crate) final_verdict: Option<Judgment>,
    pub(crate) final_score: Option<u32>,
    pub(crate) technical_accuracy: Option<f64>,
    pub(crate) finalization_failed: bool,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) finished_at: Option<DateTime<Utc>>,
}

impl Session {
    pub(crate) fn new(domain: &str, level: &str, answer_threshold: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            domain: domain.to_string(),
            level: level.to_string(),
            answer_threshold,
            turns: Vec::new(),
            asked_question_ids: HashSet::new(),
            current_question: None,
            status: SessionStatus::InProgress,
            final_verdict: None,
            final_score: None,
            technical_accuracy: None,
            finalization_failed: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn answer_threshold(&self) -> usize {
        self.answer_threshold
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn asked_question_ids(&self) -> &HashSet<String> {
        &self.asked_question_ids
    }

    /// The question the candidate is expected to answer next
    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    pub fn final_verdict(&self) -> Option<&Judgment> {
        self.final_verdict.as_ref()
    }

    /// Authenticity score, set once finished
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn technical_accuracy(&self) -> Option<f64> {
        self.technical_accuracy
    }

    /// True after the most recent finalization attempt failed
    pub fn finalization_failed(&self) -> bool {
        self.finalization_failed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Counted from the turns on every call
    pub fn candidate_turns(&self) -> usize {
        self.turns.iter().filter(|t| t.is_candidate()).count()
    }

    /// In progress with every answer collected, waiting for a finalization
    pub fn awaiting_finalization(&self) -> bool {
        !self.is_finished() && self.candidate_turns() >= self.answer_threshold
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            domain: self.domain.clone(),
            level: self.level.clone(),
            turns: self.turns.clone(),
            status: self.status,
            final_score: self.final_score,
            technical_accuracy: self.technical_accuracy,
            final_verdict: self.final_verdict.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Serializable copy of a session for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub domain: String,
    pub level: String,
    pub turns: Vec<Turn>,
    pub status: SessionStatus,
    pub final_score: Option<u32>,
    pub technical_accuracy: Option<f64>,
    pub final_verdict: Option<Judgment>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use interviewloop_analyzer::Classification;

    #[test]
    fn test_new_session_is_empty_and_in_progress() {
        let session = Session::new("JavaScript", "beginner", 5);
        assert!(session.turns().is_empty());
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.candidate_turns(), 0);
        assert!(!session.awaiting_finalization());
        assert_eq!(session.id().len(), 36);
    }

    #[test]
    fn test_candidate_turns_counted_from_turns() {
        let mut session = Session::new("React", "advanced", 1);
        session.turns.push(Turn::question("React/advanced/0", "Explain fibers"));
        session
            .turns
            .push(Turn::answer("a tree of work units", None, None));

        assert_eq!(session.candidate_turns(), 1);
        assert!(session.awaiting_finalization());
    }

    #[test]
    fn test_snapshot_serializes_turns() {
        let mut session = Session::new("React", "beginner", 5);
        session.turns.push(Turn::question("React/beginner/0", "What is JSX?"));
        session.turns.push(Turn::answer(
            "HTML in JS",
            Some("React/beginner/0".into()),
            Some(Judgment::new(0.8, Classification::Human)),
        ));

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["turns"][0]["speaker"], "interviewer");
        assert_eq!(json["turns"][0]["kind"], "question");
        assert_eq!(json["turns"][1]["question_ref"], "React/beginner/0");
        assert_eq!(json["turns"][1]["analysis"]["classification"], "human");
    }
}
