mod analyzer;
mod judgment;
mod prompts;

pub use analyzer::{AnalysisError, AnswerContext, LlmAnalyzer, ResponseAnalyzer, TranscriptContext};
pub use judgment::{Classification, Judgment, JudgmentParseError};
pub use prompts::AnalyzerPrompts;
