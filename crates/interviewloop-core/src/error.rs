use thiserror::Error;

use interviewloop_questions::QuestionError;

#[derive(Error, Debug)]
pub enum InterviewError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Level \"{level}\" not found for domain \"{domain}\"")]
    Level { domain: String, level: String },

    #[error("Session is finished and can no longer change")]
    SessionClosed,

    #[error("Finalization failed: {0}")]
    FinalizationFailed(String),

    #[error("Finalization not due: {answered} of {threshold} answers collected")]
    FinalizationNotDue { answered: usize, threshold: usize },

    #[error("Question source error: {0}")]
    Question(#[from] QuestionError),
}

impl InterviewError {
    /// Map a question source error raised while opening a session
    pub(crate) fn at_start(error: QuestionError) -> Self {
        match error {
            QuestionError::UnknownLevel { domain, level } => Self::Level { domain, level },
            other => Self::Configuration(other.to_string()),
        }
    }

    /// True when the caller may retry with `finalize`
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FinalizationFailed(_))
    }
}
