/// Default number of answers collected before scoring
pub const DEFAULT_ANSWER_THRESHOLD: usize = 5;

/// Settings for new interview sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewConfig {
    /// Candidate answers collected before the session is scored
    pub answer_threshold: usize,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            answer_threshold: DEFAULT_ANSWER_THRESHOLD,
        }
    }
}

impl InterviewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero is treated as one; a session always collects at least one answer
    pub fn with_answer_threshold(mut self, threshold: usize) -> Self {
        self.answer_threshold = threshold.max(1);
        self
    }
}
