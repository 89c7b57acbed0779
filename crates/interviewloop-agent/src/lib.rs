mod command;
mod openai;
mod output;
mod spawner;
mod template;
mod traits;

pub use command::CommandAgent;
pub use openai::{OpenAiAgent, DEFAULT_MODEL, OPENAI_API_URL};
pub use output::AgentOutput;
pub use spawner::{ProcessOutput, ProcessSpawner};
pub use template::{PromptTemplate, TemplateError, TemplateVars};
pub use traits::{Agent, AgentConfig, AgentError, AgentType, CompletionRequest};

/// Create an agent by type
pub fn create_agent(agent_type: AgentType, command: Option<Vec<String>>) -> Box<dyn Agent> {
    match agent_type {
        AgentType::OpenAi => Box::new(OpenAiAgent::new()),
        AgentType::Command => match command {
            Some(argv) => Box::new(CommandAgent::from_argv(argv)),
            None => Box::new(CommandAgent::default()),
        },
    }
}
