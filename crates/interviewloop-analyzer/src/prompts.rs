use interviewloop_agent::{PromptTemplate, TemplateError, TemplateVars};

const ANALYST_SYSTEM: &str = "You are an AI detection specialist reviewing technical interview answers. Reply with strict JSON only.";

const ANSWER_TEMPLATE: PromptTemplate = PromptTemplate::new(
    "answer_analysis",
    r#"You are an AI detection specialist analyzing technical interview responses. Your task is to identify if the CANDIDATE's answer shows signs of AI assistance, and to grade its technical accuracy.

CRITICAL ANALYSIS GUIDELINES:
- Focus ONLY on the CANDIDATE's response
- Technical interviews often have precise, well-structured answers - this doesn't automatically mean AI
- Look for UNNATURAL patterns, not just "good" answers

KEY AI INDICATORS TO DETECT:
1. UNNATURAL CONSISTENCY: Perfect grammar and structure regardless of question complexity
2. LACK OF PERSONALIZATION: No specific examples, anecdotes, or personal experiences
3. GENERIC RESPONSES: Answers that could apply to any similar question
4. UNNATURAL DEPTH: {{ level }} candidates giving expert-level comprehensive answers
5. REPETITIVE PATTERNS: Same sentence structures, transition words, or phrasing
6. MISSING HUMAN ELEMENTS: No hesitation markers, self-correction, or conversational flow

INTERVIEW CONTEXT:
- Domain: {{ domain }}
- Expected Level: {{ level }}
- Candidate should have {{ level }}-appropriate knowledge

QUESTION: {{ question }}
CANDIDATE'S ANSWER: {{ answer }}

Respond with STRICT JSON format only:
{
  "confidence": 0.0 to 1.0,
  "classification": "human" or "ai",
  "accuracy": 0.0 to 1.0 (technical correctness of the answer),
  "key_indicators": ["specific pattern 1", "pattern 2"],
  "reasoning": "Why this classification was chosen",
  "feedback": "One or two sentences of interviewer feedback on the answer"
}"#,
);

const TRANSCRIPT_TEMPLATE: PromptTemplate = PromptTemplate::new(
    "transcript_analysis",
    r#"Analyze the following interview transcript and determine if the CANDIDATE's responses show signs of AI assistance or generation.

INTERVIEW CONTEXT:
- Domain: {{ domain }}
- Level: {{ level }}
- Total conversation turns: {{ turn_count }}

FULL TRANSCRIPT:
{{ transcript }}

ANALYSIS CRITERIA:
1. Response Patterns: Look for unusually consistent sentence structure, perfect grammar, or lack of human hesitation
2. Content Depth: Check if answers are overly generic or lack personal experience examples
3. Consistency: Note if responses show artificial consistency in length and complexity
4. Domain Knowledge: Assess if answers match the expected level for {{ level }} level
5. Conversational Flow: Look for unnatural transitions or overly structured responses

RESPONSE FORMAT (JSON only):
{
  "confidence": 0.85,
  "classification": "human" | "ai",
  "key_indicators": ["indicator1", "indicator2"],
  "reasoning": "Brief explanation of the classification decision",
  "human_like_score": 0.75,
  "analysis_summary": "Short summary of findings"
}

Provide ONLY the JSON response, no additional text."#,
);

/// Prompt templates for the analyzer
pub struct AnalyzerPrompts;

impl AnalyzerPrompts {
    pub fn system() -> &'static str {
        ANALYST_SYSTEM
    }

    /// Build the per-answer analysis prompt
    pub fn build_answer_prompt(
        answer: &str,
        question: &str,
        domain: &str,
        level: &str,
    ) -> Result<String, TemplateError> {
        let mut vars = TemplateVars::new();
        vars.insert("answer", answer.to_string());
        vars.insert("question", question.to_string());
        vars.insert("domain", domain.to_string());
        vars.insert("level", level.to_string());
        ANSWER_TEMPLATE.render(&vars)
    }

    /// Build the whole-transcript analysis prompt
    pub fn build_transcript_prompt(
        transcript: &str,
        domain: &str,
        level: &str,
    ) -> Result<String, TemplateError> {
        let turn_count = transcript.lines().filter(|l| is_turn_line(l)).count();

        let mut vars = TemplateVars::new();
        vars.insert("transcript", transcript.to_string());
        vars.insert("domain", domain.to_string());
        vars.insert("level", level.to_string());
        vars.insert("turn_count", turn_count.to_string());
        TRANSCRIPT_TEMPLATE.render(&vars)
    }
}

fn is_turn_line(line: &str) -> bool {
    line.starts_with("Interviewer:") || line.starts_with("Candidate:")
}
