use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

use crate::{Question, QuestionBank};

/// Errors a question source can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("Domain \"{0}\" not found in questions database")]
    UnknownDomain(String),

    #[error("Level \"{level}\" not found for domain \"{domain}\"")]
    UnknownLevel { domain: String, level: String },

    #[error("No questions configured for {domain}/{level}")]
    Empty { domain: String, level: String },
}

/// Supplies questions for a (domain, level) pool.
///
/// `Ok(None)` means every question in the pool is already in `asked`; the
/// caller owns the asked set and decides when to reset it.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn next(
        &self,
        domain: &str,
        level: &str,
        asked: &HashSet<String>,
    ) -> Result<Option<Question>, QuestionError>;
}

/// Random selection among the unseen questions of a [`QuestionBank`]
pub struct BankQuestionSource {
    bank: QuestionBank,
}

impl BankQuestionSource {
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    fn pick(
        &self,
        domain: &str,
        level: &str,
        asked: &HashSet<String>,
    ) -> Result<Option<Question>, QuestionError> {
        if !self.bank.has_domain(domain) {
            return Err(QuestionError::UnknownDomain(domain.to_string()));
        }

        let pool = self
            .bank
            .pool(domain, level)
            .ok_or_else(|| QuestionError::UnknownLevel {
                domain: domain.to_string(),
                level: level.to_string(),
            })?;

        if pool.is_empty() {
            return Err(QuestionError::Empty {
                domain: domain.to_string(),
                level: level.to_string(),
            });
        }

        let available: Vec<&Question> = pool.iter().filter(|q| !asked.contains(&q.id)).collect();

        debug!(
            domain,
            level,
            available = available.len(),
            pool = pool.len(),
            "Selecting question"
        );

        Ok(available
            .choose(&mut rand::thread_rng())
            .map(|q| (*q).clone()))
    }
}

#[async_trait]
impl QuestionSource for BankQuestionSource {
    async fn next(
        &self,
        domain: &str,
        level: &str,
        asked: &HashSet<String>,
    ) -> Result<Option<Question>, QuestionError> {
        self.pick(domain, level, asked)
    }
}
