use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Structured log events for the interview loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    SessionStarted {
        session_id: String,
        domain: String,
        level: String,
        threshold: usize,
    },
    QuestionAsked {
        /// 1-based number of the answer this question is waiting for
        answer_number: usize,
        question_id: String,
    },
    PoolReset {
        domain: String,
        level: String,
    },
    AnswerSubmitted {
        answer_number: usize,
        chars: usize,
    },
    AnalysisCompleted {
        answer_number: usize,
        judgment: String,
    },
    AnalysisUnavailable {
        answer_number: usize,
        error: String,
    },
    FinalizationStarted {
        answers: usize,
    },
    SessionFinished {
        authenticity_score: u32,
        technical_accuracy: f64,
        classification: String,
    },
    FinalizationFailed {
        error: String,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors and visual structure
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for interview events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
    quiet: bool,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
            quiet: false,
        }
    }

    /// Logger that prints nothing to the console
    pub fn silent() -> Self {
        Self {
            format: LogFormat::Compact,
            file_writer: None,
            quiet: true,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
            quiet: false,
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        if self.quiet {
            return;
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        match event {
            LogEvent::SessionStarted {
                domain,
                level,
                threshold,
                ..
            } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{}",
                    "╭─────────────────────────────────────────────────────────────────────╮"
                        .bright_blue()
                );
                let _ = writeln!(
                    stderr,
                    "{}  {}{}",
                    "│".bright_blue(),
                    "interviewloop".bold().bright_white(),
                    " ".repeat(54) + &"│".bright_blue().to_string()
                );
                let _ = writeln!(
                    stderr,
                    "{}  {} {}",
                    "│".bright_blue(),
                    "Interview:".dimmed(),
                    Self::truncate_with_padding(&format!("{} / {}", domain, level), 57, 68)
                        .dimmed()
                );
                let _ = writeln!(
                    stderr,
                    "{}  {} {}",
                    "│".bright_blue(),
                    "Questions:".dimmed(),
                    Self::truncate_with_padding(&threshold.to_string(), 57, 68).dimmed()
                );
                let _ = writeln!(
                    stderr,
                    "{}",
                    "╰─────────────────────────────────────────────────────────────────────╯"
                        .bright_blue()
                );
                let _ = writeln!(stderr);
            }
            LogEvent::QuestionAsked { answer_number, .. } => {
                let text = format!("─ Question {} ", answer_number);
                let padding = "─".repeat(67usize.saturating_sub(text.chars().count()));
                let _ = writeln!(
                    stderr,
                    "{}{}{}",
                    "┌".bright_blue(),
                    text.bright_blue().bold(),
                    padding.bright_blue()
                );
            }
            LogEvent::PoolReset { domain, level } => {
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "↺".dimmed(),
                    format!("All {} / {} questions asked, starting over", domain, level).dimmed()
                );
            }
            LogEvent::AnswerSubmitted { .. } => {
                let _ = writeln!(
                    stderr,
                    "  {} {}",
                    "▶".bright_magenta(),
                    "ANALYZING".bright_magenta().bold()
                );
            }
            LogEvent::AnalysisCompleted { judgment, .. } => {
                let styled = if judgment.starts_with("HUMAN") {
                    format!("✓ Analysis: {}", judgment).bright_green().to_string()
                } else {
                    format!("→ Analysis: {}", judgment).bright_yellow().to_string()
                };
                let _ = writeln!(stderr, "    {}", styled);
                let _ = writeln!(
                    stderr,
                    "{}",
                    "└─────────────────────────────────────────────────────────────────────┘"
                        .bright_blue()
                );
                let _ = writeln!(stderr);
            }
            LogEvent::AnalysisUnavailable { error, .. } => {
                let _ = writeln!(
                    stderr,
                    "    {} Analysis unavailable: {}",
                    "✗".bright_red(),
                    error.bright_red()
                );
                let _ = writeln!(stderr);
            }
            LogEvent::FinalizationStarted { answers } => {
                let _ = writeln!(
                    stderr,
                    "  {} {} ({} answers)",
                    "▶".bright_cyan(),
                    "SCORING INTERVIEW".bright_cyan().bold(),
                    answers
                );
            }
            LogEvent::SessionFinished { .. } => {
                // The summary turn carries the scores; the CLI prints it
            }
            LogEvent::FinalizationFailed { error } => {
                let _ = writeln!(stderr);
                let _ = writeln!(
                    stderr,
                    "{} Scoring failed: {}",
                    "✗".bright_red(),
                    error.bright_red()
                );
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::SessionStarted {
                session_id,
                domain,
                level,
                ..
            } => format!(
                "[{}] session:start {} {}/{}",
                timestamp, session_id, domain, level
            ),
            LogEvent::QuestionAsked {
                answer_number,
                question_id,
            } => format!("[{}] question:{} {}", timestamp, answer_number, question_id),
            LogEvent::PoolReset { domain, level } => {
                format!("[{}] pool:reset {}/{}", timestamp, domain, level)
            }
            LogEvent::AnswerSubmitted {
                answer_number,
                chars,
            } => format!("[{}] answer:{} {}c", timestamp, answer_number, chars),
            LogEvent::AnalysisCompleted {
                answer_number,
                judgment,
            } => format!("[{}] analysis:{} {}", timestamp, answer_number, judgment),
            LogEvent::AnalysisUnavailable {
                answer_number,
                error,
            } => format!(
                "[{}] analysis:{} unavailable {}",
                timestamp, answer_number, error
            ),
            LogEvent::FinalizationStarted { answers } => {
                format!("[{}] finalize:start {}", timestamp, answers)
            }
            LogEvent::SessionFinished {
                authenticity_score,
                technical_accuracy,
                classification,
            } => format!(
                "[{}] session:done score={} accuracy={:.2} {}",
                timestamp, authenticity_score, technical_accuracy, classification
            ),
            LogEvent::FinalizationFailed { error } => {
                format!("[{}] finalize:failed {}", timestamp, error)
            }
        };
        let _ = writeln!(stderr, "{}", msg);
    }

    /// Truncate a string and pad to exact width
    fn truncate_with_padding(s: &str, max_len: usize, total_width: usize) -> String {
        let truncated = if s.chars().count() > max_len {
            let head: String = s.chars().take(max_len - 3).collect();
            format!("{}...", head)
        } else {
            s.to_string()
        };

        let padding_needed = total_width.saturating_sub(truncated.chars().count() + 1);
        format!("{}{}│", truncated, " ".repeat(padding_needed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("fancy".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_file_logging_writes_timestamped_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("events.jsonl");

        let logger = Logger::with_file(LogFormat::Compact, &path).unwrap();
        logger.log(&LogEvent::PoolReset {
            domain: "React".into(),
            level: "beginner".into(),
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["event"], "pool_reset");
        assert_eq!(value["domain"], "React");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_truncate_with_padding() {
        let padded = Logger::truncate_with_padding("JavaScript / beginner", 57, 68);
        assert!(padded.ends_with('│'));
        assert_eq!(padded.chars().count(), 68);
    }
}
