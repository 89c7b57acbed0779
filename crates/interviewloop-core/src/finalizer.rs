use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use interviewloop_analyzer::{Classification, Judgment, ResponseAnalyzer, TranscriptContext};
use interviewloop_logging::{LogEvent, Logger};

use crate::error::InterviewError;
use crate::outcome::FinalReport;
use crate::session::{Session, SessionStatus, Turn};

const FINALIZATION_NOTICE: &str =
    "We could not calculate your final results. Please try again.";

/// Scores a session once every answer has been collected
pub struct SessionFinalizer<'a> {
    analyzer: &'a dyn ResponseAnalyzer,
    logger: Arc<Logger>,
}

impl<'a> SessionFinalizer<'a> {
    pub fn new(analyzer: &'a dyn ResponseAnalyzer, logger: Arc<Logger>) -> Self {
        Self { analyzer, logger }
    }

    /// Judge the whole transcript and close the session.
    ///
    /// On analyzer failure the session stays in progress with
    /// `finalization_failed` set and a notice turn appended.
    pub async fn finalize(&self, session: &mut Session) -> Result<FinalReport, InterviewError> {
        self.finalize_with_preamble(session, None).await
    }

    /// `preamble` is prepended to whichever interviewer turn this attempt appends
    pub(crate) async fn finalize_with_preamble(
        &self,
        session: &mut Session,
        preamble: Option<&str>,
    ) -> Result<FinalReport, InterviewError> {
        if session.is_finished() {
            return Err(InterviewError::SessionClosed);
        }

        let answers = session.candidate_turns();
        if answers < session.answer_threshold {
            return Err(InterviewError::FinalizationNotDue {
                answered: answers,
                threshold: session.answer_threshold,
            });
        }

        self.logger.log(&LogEvent::FinalizationStarted { answers });

        let transcript = build_transcript(&session.turns);
        let context = TranscriptContext {
            domain: &session.domain,
            level: &session.level,
        };

        let verdict = match self.analyzer.analyze_transcript(&transcript, &context).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, session_id = %session.id, "Transcript analysis failed");
                self.logger.log(&LogEvent::FinalizationFailed {
                    error: e.to_string(),
                });
                session.finalization_failed = true;
                session
                    .turns
                    .push(Turn::notice(with_preamble(preamble, FINALIZATION_NOTICE), None));
                return Err(InterviewError::FinalizationFailed(e.to_string()));
            }
        };

        let score = authenticity_score(&verdict);
        let accuracy = technical_accuracy(&session.turns);
        let summary = summary_text(score, accuracy, &verdict);

        session.turns.push(Turn::summary(with_preamble(preamble, &summary)));
        session.final_score = Some(score);
        session.technical_accuracy = Some(accuracy);
        session.final_verdict = Some(verdict.clone());
        session.finalization_failed = false;
        session.status = SessionStatus::Finished;

        let finished_at = Utc::now();
        session.finished_at = Some(finished_at);

        info!(
            session_id = %session.id,
            score,
            accuracy,
            classification = %verdict.classification,
            "Interview finished"
        );
        self.logger.log(&LogEvent::SessionFinished {
            authenticity_score: score,
            technical_accuracy: accuracy,
            classification: verdict.classification.to_string(),
        });

        Ok(FinalReport {
            authenticity_score: score,
            technical_accuracy: accuracy,
            verdict,
            answers,
            total_duration_secs: (finished_at - session.started_at)
                .to_std()
                .unwrap_or_default()
                .as_secs_f64(),
        })
    }
}

fn with_preamble(preamble: Option<&str>, text: &str) -> String {
    match preamble {
        Some(p) => format!("{}\n\n{}", p, text),
        None => text.to_string(),
    }
}

/// One `Speaker: text` line per turn, through the last candidate turn.
///
/// Notices left by failed finalization attempts come after the last answer
/// and are not part of what gets judged.
pub fn build_transcript(turns: &[Turn]) -> String {
    let end = turns
        .iter()
        .rposition(Turn::is_candidate)
        .map_or(0, |i| i + 1);

    turns[..end]
        .iter()
        .map(|t| format!("{}: {}", t.speaker.label(), t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 0-100. Sessions not judged human are capped at 40.
pub fn authenticity_score(verdict: &Judgment) -> u32 {
    let confidence = verdict.confidence.clamp(0.0, 1.0);
    let score = match verdict.classification {
        Classification::Human => (confidence * 100.0).round(),
        Classification::Ai | Classification::Uncertain => ((1.0 - confidence) * 40.0).round(),
    };
    score as u32
}

/// Mean of the accuracy values present on candidate turns, 0 when none are.
pub fn technical_accuracy(turns: &[Turn]) -> f64 {
    let values: Vec<f64> = turns
        .iter()
        .filter(|t| t.is_candidate())
        .filter_map(|t| t.analysis.as_ref().and_then(|j| j.accuracy))
        .collect();

    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn authenticity_label(classification: Classification) -> &'static str {
    match classification {
        Classification::Human => "Human Response",
        Classification::Ai => "AI-Assisted Response",
        Classification::Uncertain => "Inconclusive",
    }
}

/// Text of the closing interviewer turn
pub fn summary_text(score: u32, accuracy: f64, verdict: &Judgment) -> String {
    format!(
        "INTERVIEW COMPLETE\n\n\
         Final Score: {}/100\n\
         Technical Accuracy: {:.0}%\n\n\
         Authenticity: {}\n\
         AI Detection Confidence: {:.0}%\n\n\
         Thank you for completing the interview!",
        score,
        accuracy * 100.0,
        authenticity_label(verdict.classification),
        verdict.confidence * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(accuracy: Option<f64>) -> Turn {
        let analysis = accuracy.map(|a| Judgment::new(0.9, Classification::Human).with_accuracy(a));
        Turn::answer("answer", None, analysis)
    }

    #[test]
    fn test_authenticity_score_human() {
        assert_eq!(authenticity_score(&Judgment::new(0.9, Classification::Human)), 90);
        assert_eq!(authenticity_score(&Judgment::new(0.556, Classification::Human)), 56);
    }

    #[test]
    fn test_authenticity_score_capped_unless_human() {
        assert_eq!(authenticity_score(&Judgment::new(0.0, Classification::Ai)), 40);
        assert_eq!(authenticity_score(&Judgment::new(0.8, Classification::Ai)), 8);
        assert_eq!(authenticity_score(&Judgment::new(0.5, Classification::Uncertain)), 20);
        for step in 0..=100 {
            let confidence = step as f64 / 100.0;
            assert!(authenticity_score(&Judgment::new(confidence, Classification::Ai)) <= 40);
            assert!(authenticity_score(&Judgment::new(confidence, Classification::Human)) <= 100);
        }
    }

    #[test]
    fn test_technical_accuracy_is_mean_of_present_values() {
        let turns = vec![
            Turn::question("q1", "first"),
            answered(Some(0.8)),
            Turn::question("q2", "second"),
            answered(Some(0.6)),
            Turn::question("q3", "third"),
            answered(None),
            Turn::question("q4", "fourth"),
            answered(Some(1.0)),
        ];
        assert!((technical_accuracy(&turns) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_technical_accuracy_zero_without_values() {
        let turns = vec![Turn::question("q1", "first"), answered(None)];
        assert_eq!(technical_accuracy(&turns), 0.0);
    }

    #[test]
    fn test_transcript_stops_at_last_answer() {
        let turns = vec![
            Turn::question("q1", "What is a closure?"),
            Turn::answer("A function with its scope", None, None),
            Turn::notice(FINALIZATION_NOTICE, None),
        ];
        assert_eq!(
            build_transcript(&turns),
            "Interviewer: What is a closure?\nCandidate: A function with its scope"
        );
    }

    #[test]
    fn test_summary_text() {
        let verdict = Judgment::new(0.9, Classification::Human);
        let text = summary_text(90, 0.7, &verdict);
        assert!(text.starts_with("INTERVIEW COMPLETE"));
        assert!(text.contains("Final Score: 90/100"));
        assert!(text.contains("Technical Accuracy: 70%"));
        assert!(text.contains("Authenticity: Human Response"));
        assert!(text.contains("AI Detection Confidence: 90%"));
    }
}
