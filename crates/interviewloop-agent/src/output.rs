use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output captured from an agent completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutput {
    /// Completion text
    pub text: String,
    /// Model that produced the text, when the backend reports it
    pub model: Option<String>,
    /// Duration of the call
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl AgentOutput {
    pub fn new(text: String, model: Option<String>, duration: Duration) -> Self {
        Self {
            text,
            model,
            duration,
        }
    }

    /// Completion text with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
