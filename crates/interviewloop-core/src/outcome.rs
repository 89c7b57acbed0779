use serde::{Deserialize, Serialize};

use interviewloop_analyzer::{Classification, Judgment};

use crate::reward::{decide_reward, RewardPolicy};

/// Scores of a finished interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub authenticity_score: u32,
    pub technical_accuracy: f64,
    pub verdict: Judgment,
    pub answers: usize,
    pub total_duration_secs: f64,
}

impl FinalReport {
    pub fn classification(&self) -> Classification {
        self.verdict.classification
    }

    /// Coins under the default reward rule
    pub fn coins(&self) -> u64 {
        decide_reward(self.authenticity_score, self.technical_accuracy)
    }

    pub fn coins_with(&self, policy: &RewardPolicy) -> u64 {
        policy.coins(self.authenticity_score, self.technical_accuracy)
    }
}

/// What happened to the session after an answer was submitted
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank answer; the session was not touched
    Ignored,
    /// The answer was recorded and the next question asked
    NextQuestion {
        answered: usize,
        /// False when the answer could not be analyzed
        analyzed: bool,
    },
    /// The answer completed the interview
    Finished(FinalReport),
}

impl TurnOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    pub fn report(&self) -> Option<&FinalReport> {
        match self {
            Self::Finished(report) => Some(report),
            _ => None,
        }
    }
}
