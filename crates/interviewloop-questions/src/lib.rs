//! # interviewloop-questions
//!
//! Question pools for the interview loop.
//!
//! ## Key Types
//!
//! - [`QuestionBank`] - questions grouped by domain and level
//! - [`QuestionSource`] - contract the session controller consumes
//! - [`BankQuestionSource`] - random, non-repeating selection from a bank
//! - [`LlmQuestionSource`] - rephrases bank questions in an interviewer persona

mod bank;
mod builtin;
mod llm;
mod prompts;
mod roles;
mod source;

pub use bank::{BankFile, BankLoadError, Question, QuestionBank};
pub use llm::LlmQuestionSource;
pub use prompts::QuestionPrompts;
pub use roles::InterviewerRoles;
pub use source::{BankQuestionSource, QuestionError, QuestionSource};
