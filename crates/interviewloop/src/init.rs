//! Interactive initialization for interviewloop.
//!
//! Writes an `interviewloop.toml` in the current directory with
//! user-selected defaults.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Input, Select};
use std::fs;

use interviewloop_agent::{create_agent, AgentConfig, AgentType, DEFAULT_MODEL};
use interviewloop_core::DEFAULT_ANSWER_THRESHOLD;

use crate::config::{CONFIG_FILE_NAME, DEFAULT_API_KEY_ENV};

/// Agent info for display and config
struct AgentInfo {
    display_name: &'static str,
    config_name: &'static str,
    agent_type: AgentType,
}

const AGENTS: &[AgentInfo] = &[
    AgentInfo {
        display_name: "OpenAI API",
        config_name: "openai",
        agent_type: AgentType::OpenAi,
    },
    AgentInfo {
        display_name: "Local command (ollama)",
        config_name: "command",
        agent_type: AgentType::Command,
    },
];

pub async fn handle_init() -> Result<()> {
    eprintln!("{}", "Setting up interviewloop...".bold());
    eprintln!();

    eprintln!("{}", "Checking for available agents...".dimmed());

    let mut availability_config = AgentConfig::new();
    if let Ok(key) = std::env::var(DEFAULT_API_KEY_ENV) {
        availability_config = availability_config.with_api_key(key);
    }

    let mut available: Vec<&AgentInfo> = Vec::new();
    for info in AGENTS {
        let agent = create_agent(info.agent_type, None);
        if agent.is_available(&availability_config).await {
            eprintln!(
                "  {} {} ({})",
                "✓".bright_green(),
                info.display_name,
                info.config_name
            );
            available.push(info);
        } else {
            eprintln!("  {} {} (not found)", "✗".dimmed(), info.display_name);
        }
    }
    eprintln!();

    if available.is_empty() {
        eprintln!(
            "{} No agent is ready. Either export {} or install ollama:",
            "⚠".bright_yellow(),
            DEFAULT_API_KEY_ENV
        );
        eprintln!("  ollama: https://ollama.com/download");
        eprintln!();
        eprintln!(
            "The config below defaults to {}; edit it once an agent is set up.",
            "openai".bright_cyan()
        );
        available.push(&AGENTS[0]);
    }

    let selection = if available.len() == 1 {
        0
    } else {
        let items: Vec<&str> = available.iter().map(|a| a.display_name).collect();
        Select::new()
            .with_prompt("Select your default agent")
            .items(&items)
            .default(0)
            .interact()?
    };
    let agent_info = available[selection];

    let model: String = match agent_info.agent_type {
        AgentType::OpenAi => Input::new()
            .with_prompt("Model")
            .default(DEFAULT_MODEL.to_string())
            .interact_text()?,
        AgentType::Command => String::new(),
    };

    let threshold: usize = Input::new()
        .with_prompt("Questions per interview")
        .default(DEFAULT_ANSWER_THRESHOLD)
        .interact_text()?;

    let config_path = std::env::current_dir()
        .context("Failed to get current directory")?
        .join(CONFIG_FILE_NAME);

    if config_path.exists() {
        eprintln!(
            "{} Config already exists at {}",
            "⚠".bright_yellow(),
            config_path.display()
        );

        let overwrite = Select::new()
            .with_prompt("Overwrite existing config?")
            .items(&["No, keep existing", "Yes, replace it"])
            .default(0)
            .interact()?;

        if overwrite == 0 {
            eprintln!();
            eprintln!("Keeping existing config. Edit it manually if needed:");
            eprintln!("  {}", config_path.display().to_string().dimmed());
            return Ok(());
        }
    }

    fs::write(
        &config_path,
        render_config(agent_info.config_name, &model, threshold),
    )
    .with_context(|| format!("Failed to write {}", config_path.display()))?;

    eprintln!();
    eprintln!(
        "{} Config saved to {}",
        "✓".bright_green(),
        config_path.display()
    );
    eprintln!();
    eprintln!(
        "Run {} to start an interview.",
        "interviewloop".bright_cyan()
    );

    Ok(())
}

fn render_config(agent: &str, model: &str, threshold: usize) -> String {
    let model_line = if model.is_empty() {
        "# model = \"\"".to_string()
    } else {
        format!("model = \"{}\"", model)
    };

    format!(
        r#"agent = "{agent}"
{model_line}
threshold = {threshold}
# command = ["ollama", "run", "llama3"]
# api_key_env = "{key_env}"
# timeout_secs = 60
# questions_dir = "questions"
# user = "me"
# log_file = "interviewloop-progress.jsonl"

# [command_env]
# OLLAMA_HOST = "127.0.0.1:11434"

# [personas]
# Python = "Python Tech Lead at a AI startup"

# Override per role:
# [interviewer]
# model = "{default_model}"

# [analyzer]
# model = "gpt-4o"

# [reward]
# min_authenticity = 60
# coins_per_accuracy = 100
"#,
        key_env = DEFAULT_API_KEY_ENV,
        default_model = DEFAULT_MODEL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    #[test]
    fn test_rendered_config_parses() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            render_config("openai", "gpt-4o-mini", 3),
        )
        .unwrap();

        let config = ProjectConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.interviewer_agent(), Some("openai"));
        assert_eq!(config.analyzer_model(), Some("gpt-4o-mini"));
        assert_eq!(config.threshold, Some(3));
    }

    #[test]
    fn test_rendered_config_without_model() {
        let rendered = render_config("command", "", 5);
        assert!(rendered.contains("# model = \"\""));
        let config: ProjectConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(config.model, None);
        assert_eq!(config.agent.as_deref(), Some("command"));
    }
}
