//! # interviewloop-core
//!
//! The interview session engine: a [`SessionController`] asks questions,
//! records answers with their analysis and hands a complete session to the
//! [`SessionFinalizer`] for scoring.

mod config;
mod controller;
mod error;
mod finalizer;
mod outcome;
mod reward;
mod session;

pub use config::{InterviewConfig, DEFAULT_ANSWER_THRESHOLD};
pub use controller::SessionController;
pub use error::InterviewError;
pub use finalizer::{
    authenticity_score, build_transcript, summary_text, technical_accuracy, SessionFinalizer,
};
pub use outcome::{FinalReport, TurnOutcome};
pub use reward::{decide_reward, RewardPolicy};
pub use session::{Session, SessionSnapshot, SessionStatus, Speaker, Turn, TurnKind};

pub use interviewloop_analyzer::{Classification, Judgment};
