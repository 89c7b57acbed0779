use interviewloop_agent::{PromptTemplate, TemplateError, TemplateVars};

const INTERVIEWER_SYSTEM: &str =
    "You are a technical interviewer. Stay in character and ask questions clearly.";

const QUESTION_TEMPLATE: PromptTemplate = PromptTemplate::new(
    "interviewer_question",
    r#"You are {{ role }}, conducting a technical interview for a {{ level }} level candidate.

DOMAIN: {{ domain }}
LEVEL: {{ level }}
CURRENT QUESTION: "{{ question }}"

INTERVIEW INSTRUCTIONS:
1. Ask this question clearly and professionally
2. Adapt the phrasing based on the candidate's level ({{ level }})
3. Maintain your role as {{ role }}
4. Be concise but clear
5. Do not provide hints or answers
6. Wait for the candidate's response

Ask the question now:"#,
);

/// Prompt templates for the interviewer persona
pub struct QuestionPrompts;

impl QuestionPrompts {
    pub fn system() -> &'static str {
        INTERVIEWER_SYSTEM
    }

    /// Build the prompt asking the model to phrase a bank question
    pub fn build_question_prompt(
        role: &str,
        domain: &str,
        level: &str,
        question: &str,
    ) -> Result<String, TemplateError> {
        let mut vars = TemplateVars::new();
        vars.insert("role", role.to_string());
        vars.insert("domain", domain.to_string());
        vars.insert("level", level.to_string());
        vars.insert("question", question.to_string());
        QUESTION_TEMPLATE.render(&vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_mentions_role_and_question() {
        let prompt = QuestionPrompts::build_question_prompt(
            "React Core Team Member",
            "React",
            "beginner",
            "What is JSX?",
        )
        .unwrap();

        assert!(prompt.starts_with("You are React Core Team Member, conducting"));
        assert!(prompt.contains("CURRENT QUESTION: \"What is JSX?\""));
        assert!(prompt.contains("level (beginner)"));
    }
}
