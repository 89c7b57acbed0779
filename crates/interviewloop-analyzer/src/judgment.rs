use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Who the analyzer believes wrote the answer(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Human,
    Ai,
    Uncertain,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Human => write!(f, "human"),
            Classification::Ai => write!(f, "ai"),
            Classification::Uncertain => write!(f, "uncertain"),
        }
    }
}

impl std::str::FromStr for Classification {
    type Err = JudgmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "human" => Ok(Classification::Human),
            "ai" | "ai-assisted" | "ai_assisted" | "ai-generated" => Ok(Classification::Ai),
            "uncertain" | "unknown" => Ok(Classification::Uncertain),
            other => Err(JudgmentParseError::UnknownClassification(other.to_string())),
        }
    }
}

/// Structured verdict on one answer or on a whole transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    /// Confidence in the classification (0.0 - 1.0)
    pub confidence: f64,
    pub classification: Classification,
    /// Technical correctness (0.0 - 1.0), independent of authenticity
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Short explanatory tags, in the order the analyzer gave them
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub human_like_score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Brief interviewer feedback on the answer
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Error, Debug)]
pub enum JudgmentParseError {
    #[error("No JSON object found in analyzer output")]
    NoJsonFound,

    #[error("Failed to parse judgment JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Unknown classification: {0}")]
    UnknownClassification(String),

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Wire shape of the analyzer's JSON reply
#[derive(Debug, Deserialize)]
struct RawJudgment {
    confidence: f64,
    classification: String,
    #[serde(default)]
    accuracy: Option<f64>,
    #[serde(default, alias = "indicators")]
    key_indicators: Vec<String>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    human_like_score: Option<f64>,
    #[serde(default)]
    analysis_summary: Option<String>,
    #[serde(default)]
    feedback: Option<String>,
}

impl Judgment {
    pub fn new(confidence: f64, classification: Classification) -> Self {
        Self {
            confidence,
            classification,
            accuracy: None,
            indicators: Vec::new(),
            reasoning: String::new(),
            human_like_score: None,
            summary: None,
            feedback: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Parse a judgment from analyzer output text.
    ///
    /// Accepts a bare JSON object, a fenced ```json block, or an object
    /// embedded in surrounding prose.
    pub fn parse(output: &str) -> Result<Self, JudgmentParseError> {
        debug!(output_len = output.len(), "Parsing analyzer judgment");

        let json = extract_json(output).ok_or(JudgmentParseError::NoJsonFound)?;
        let raw: RawJudgment = serde_json::from_str(json)?;

        let judgment = Judgment {
            confidence: raw.confidence,
            classification: raw.classification.parse()?,
            accuracy: raw.accuracy,
            indicators: raw.key_indicators,
            reasoning: raw.reasoning,
            human_like_score: raw.human_like_score,
            summary: raw.analysis_summary.filter(|s| !s.trim().is_empty()),
            feedback: raw.feedback.filter(|s| !s.trim().is_empty()),
        };
        judgment.validate()?;
        Ok(judgment)
    }

    fn validate(&self) -> Result<(), JudgmentParseError> {
        check_unit("confidence", self.confidence)?;
        if let Some(accuracy) = self.accuracy {
            check_unit("accuracy", accuracy)?;
        }
        if let Some(score) = self.human_like_score {
            check_unit("human_like_score", score)?;
        }
        Ok(())
    }

    /// Get a short description of the judgment for logging
    pub fn short_description(&self) -> String {
        match self.accuracy {
            Some(accuracy) => format!(
                "{} ({:.0}% confidence, {:.0}% accuracy)",
                self.classification.to_string().to_uppercase(),
                self.confidence * 100.0,
                accuracy * 100.0
            ),
            None => format!(
                "{} ({:.0}% confidence)",
                self.classification.to_string().to_uppercase(),
                self.confidence * 100.0
            ),
        }
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), JudgmentParseError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(JudgmentParseError::OutOfRange { field, value })
    }
}

fn extract_json(output: &str) -> Option<&str> {
    let body = match output.find("```") {
        Some(fence) => {
            let after = &output[fence + 3..];
            let after = after.strip_prefix("json").unwrap_or(after);
            match after.find("```") {
                Some(end) => &after[..end],
                None => after,
            }
        }
        None => output,
    };

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| body[start..=end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_json() {
        let output = r#"{"confidence": 0.9, "classification": "human", "accuracy": 0.7, "key_indicators": ["hesitation", "personal example"], "reasoning": "Natural phrasing"}"#;

        let judgment = Judgment::parse(output).unwrap();
        assert_eq!(judgment.classification, Classification::Human);
        assert!((judgment.confidence - 0.9).abs() < 0.001);
        assert_eq!(judgment.accuracy, Some(0.7));
        assert_eq!(judgment.indicators, vec!["hesitation", "personal example"]);
        assert_eq!(judgment.reasoning, "Natural phrasing");
    }

    #[test]
    fn test_parse_fenced_json_with_prose() {
        let output = r#"Here is my analysis:

```json
{"confidence": 0.85, "classification": "AI", "indicators": ["uniform structure"], "reasoning": "Too polished", "human_like_score": 0.2, "analysis_summary": "Likely generated"}
```
Let me know if you need more."#;

        let judgment = Judgment::parse(output).unwrap();
        assert_eq!(judgment.classification, Classification::Ai);
        assert_eq!(judgment.indicators, vec!["uniform structure"]);
        assert_eq!(judgment.human_like_score, Some(0.2));
        assert_eq!(judgment.summary.as_deref(), Some("Likely generated"));
        assert_eq!(judgment.accuracy, None);
    }

    #[test]
    fn test_parse_embedded_json() {
        let output = r#"Verdict: {"confidence": 0.5, "classification": "uncertain", "reasoning": ""} done"#;
        let judgment = Judgment::parse(output).unwrap();
        assert_eq!(judgment.classification, Classification::Uncertain);
    }

    #[test]
    fn test_parse_no_json() {
        let result = Judgment::parse("The candidate seems human.");
        assert!(matches!(result, Err(JudgmentParseError::NoJsonFound)));
    }

    #[test]
    fn test_parse_rejects_out_of_range_confidence() {
        let result = Judgment::parse(r#"{"confidence": 85, "classification": "human"}"#);
        assert!(matches!(
            result,
            Err(JudgmentParseError::OutOfRange {
                field: "confidence",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_classification() {
        let result = Judgment::parse(r#"{"confidence": 0.4, "classification": "robot"}"#);
        assert!(matches!(
            result,
            Err(JudgmentParseError::UnknownClassification(_))
        ));
    }

    #[test]
    fn test_short_description() {
        let judgment = Judgment::new(0.9, Classification::Human).with_accuracy(0.75);
        assert_eq!(
            judgment.short_description(),
            "HUMAN (90% confidence, 75% accuracy)"
        );
    }
}
