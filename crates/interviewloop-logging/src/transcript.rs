use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// One line of a transcript JSONL file.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptLine {
    SessionStart {
        timestamp: DateTime<Utc>,
        session_id: String,
        domain: String,
        level: String,
        threshold: usize,
        interviewer_agent: String,
        analyzer_agent: String,
    },
    Turn {
        index: usize,
        #[serde(flatten)]
        turn: serde_json::Value,
    },
    SessionEnd {
        status: String,
        answers: usize,
        authenticity_score: Option<u32>,
        technical_accuracy: Option<f64>,
        classification: Option<String>,
        coins: Option<u64>,
        duration_secs: f64,
        timestamp: DateTime<Utc>,
    },
}

/// Writes an interview transcript as JSONL under
/// `~/.local/share/interviewloop/sessions/`.
pub struct TranscriptWriter {
    file: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl TranscriptWriter {
    /// File name is the UTC start time plus a short hash of the session id.
    pub fn new(session_id: &str) -> io::Result<Self> {
        let sessions_dir = Self::sessions_dir()?;
        fs::create_dir_all(&sessions_dir)?;

        let timestamp_str = Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let filename = format!("{}_{}.jsonl", timestamp_str, short_hash(session_id));

        Self::with_path(sessions_dir.join(filename))
    }

    /// Write to an explicit path, creating parent directories.
    pub fn with_path(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;

        Ok(Self {
            file: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_start(
        &self,
        session_id: &str,
        domain: &str,
        level: &str,
        threshold: usize,
        interviewer_agent: &str,
        analyzer_agent: &str,
    ) {
        self.write_line(&TranscriptLine::SessionStart {
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
            domain: domain.to_string(),
            level: level.to_string(),
            threshold,
            interviewer_agent: interviewer_agent.to_string(),
            analyzer_agent: analyzer_agent.to_string(),
        });
    }

    /// Write one turn. The turn is serialized and its fields are inlined
    /// next to `index`; this crate does not depend on the session model.
    pub fn write_turn<T: Serialize>(&self, index: usize, turn: &T) {
        let turn = match serde_json::to_value(turn) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, index, "Skipping unserializable transcript turn");
                return;
            }
        };
        self.write_line(&TranscriptLine::Turn { index, turn });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn write_end(
        &self,
        status: &str,
        answers: usize,
        authenticity_score: Option<u32>,
        technical_accuracy: Option<f64>,
        classification: Option<&str>,
        coins: Option<u64>,
        duration_secs: f64,
    ) {
        self.write_line(&TranscriptLine::SessionEnd {
            status: status.to_string(),
            answers,
            authenticity_score,
            technical_accuracy,
            classification: classification.map(String::from),
            coins,
            duration_secs,
            timestamp: Utc::now(),
        });
    }

    fn write_line(&self, line: &TranscriptLine) {
        if let Ok(json) = serde_json::to_string(line) {
            if let Ok(mut writer) = self.file.lock() {
                let _ = writeln!(writer, "{}", json);
                let _ = writer.flush();
            }
        }
    }

    fn sessions_dir() -> io::Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine data directory",
            )
        })?;
        Ok(data_dir.join("interviewloop").join("sessions"))
    }
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash = hex::encode(hasher.finalize());
    hash[..6].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct FakeTurn<'a> {
        speaker: &'a str,
        text: &'a str,
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_start_turns_and_end() {
        let dir = TempDir::new().unwrap();
        let writer = TranscriptWriter::with_path(dir.path().join("t.jsonl")).unwrap();

        writer.write_start("abc", "React", "beginner", 2, "openai", "openai");
        writer.write_turn(
            0,
            &FakeTurn {
                speaker: "interviewer",
                text: "What is JSX?",
            },
        );
        writer.write_turn(
            1,
            &FakeTurn {
                speaker: "candidate",
                text: "Syntax sugar",
            },
        );
        writer.write_end("finished", 1, Some(90), Some(0.7), Some("human"), Some(70), 1.5);

        let lines = read_lines(writer.path());
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["type"], "session_start");
        assert_eq!(lines[0]["threshold"], 2);
        assert_eq!(lines[1]["type"], "turn");
        assert_eq!(lines[1]["index"], 0);
        assert_eq!(lines[1]["speaker"], "interviewer");
        assert_eq!(lines[2]["text"], "Syntax sugar");
        assert_eq!(lines[3]["type"], "session_end");
        assert_eq!(lines[3]["authenticity_score"], 90);
        assert_eq!(lines[3]["coins"], 70);
    }

    #[test]
    fn test_with_path_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("t.jsonl");
        let writer = TranscriptWriter::with_path(&path).unwrap();
        assert_eq!(writer.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_short_hash_is_stable() {
        assert_eq!(short_hash("session-1"), short_hash("session-1"));
        assert_eq!(short_hash("session-1").len(), 6);
        assert_ne!(short_hash("session-1"), short_hash("session-2"));
    }
}
