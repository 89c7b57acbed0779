use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::builtin;

/// A single question served to the candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// On-disk bank file: one domain with its questions per level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankFile {
    pub domain: String,
    pub levels: BTreeMap<String, Vec<String>>,
}

#[derive(Error, Debug)]
pub enum BankLoadError {
    #[error("Failed to read question bank {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse question bank {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Questions grouped by domain, then level
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    domains: BTreeMap<String, BTreeMap<String, Vec<Question>>>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add questions for a domain/level pool. Ids are `<domain>/<level>/<index>`
    /// and keep counting when a pool is extended.
    pub fn add_level<I, S>(&mut self, domain: &str, level: &str, questions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pool = self
            .domains
            .entry(domain.to_string())
            .or_default()
            .entry(level.to_string())
            .or_default();

        for text in questions {
            let id = format!("{}/{}/{}", domain, level, pool.len());
            pool.push(Question::new(id, text));
        }
    }

    pub fn add_file(&mut self, file: BankFile) {
        for (level, questions) in file.levels {
            self.add_level(&file.domain, &level, questions);
        }
    }

    /// Load every `*.json` bank file in a directory, in file name order
    pub fn load_dir(dir: &Path) -> Result<Self, BankLoadError> {
        let io_err = |source| BankLoadError::Io {
            path: dir.display().to_string(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut bank = Self::new();
        for path in paths {
            let content = std::fs::read_to_string(&path).map_err(|source| BankLoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let file: BankFile =
                serde_json::from_str(&content).map_err(|source| BankLoadError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
            debug!(path = %path.display(), domain = %file.domain, "Loaded question bank");
            bank.add_file(file);
        }

        Ok(bank)
    }

    /// The bank shipped with the binary
    pub fn builtin() -> Self {
        let mut bank = Self::new();
        for (domain, level, questions) in builtin::POOLS {
            bank.add_level(domain, level, questions.iter().copied());
        }
        bank
    }

    pub fn domains(&self) -> Vec<&str> {
        self.domains.keys().map(String::as_str).collect()
    }

    /// Levels available for a domain; empty if the domain is unknown
    pub fn levels(&self, domain: &str) -> Vec<&str> {
        self.domains
            .get(domain)
            .map(|levels| levels.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    /// The question pool for a domain/level, if both exist
    pub fn pool(&self, domain: &str, level: &str) -> Option<&[Question]> {
        self.domains
            .get(domain)
            .and_then(|levels| levels.get(level))
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
