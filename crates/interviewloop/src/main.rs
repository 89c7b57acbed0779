mod config;
mod history;
mod init;
mod interview;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use interviewloop_agent::AgentType;
use interviewloop_db::Database;
use interviewloop_logging::LogFormat;

use crate::config::ProjectConfig;

#[derive(Parser, Debug)]
#[command(
    name = "interviewloop",
    about = "Practice technical interviews with AI-scored answers",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an interactive interview (the default)
    Start(StartArgs),

    /// List the domains and levels of the question bank
    Domains {
        /// Directory of JSON question bank files
        #[arg(long)]
        questions_dir: Option<PathBuf>,
    },

    /// Show past interviews
    History {
        #[arg(long)]
        domain: Option<String>,

        #[arg(long)]
        level: Option<String>,

        /// Maximum number of interviews to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Only show this user's interviews
        #[arg(long)]
        user: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one past interview with its transcript
    Show {
        /// Interview id, as listed by `history --json`
        id: String,

        /// Output the stored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a coin balance
    Wallet {
        #[arg(long)]
        user: Option<String>,
    },

    /// Write a starter interviewloop.toml in the current directory
    Init,
}

#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Interview domain (prompted for if omitted)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Difficulty level (prompted for if omitted)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Answers collected before scoring
    #[arg(short = 'n', long)]
    pub threshold: Option<usize>,

    /// Agent for both interviewer and analyzer
    #[arg(short, long, value_enum)]
    pub agent: Option<AgentChoice>,

    /// Model to use (if agent supports it)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Directory of JSON question bank files
    #[arg(long)]
    pub questions_dir: Option<PathBuf>,

    /// Wallet owner
    #[arg(long)]
    pub user: Option<String>,

    /// Print the finished session as JSON
    #[arg(long)]
    pub json_output: bool,

    /// Progress output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatChoice>,

    /// Also append progress events as JSON lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AgentChoice {
    Openai,
    Command,
}

impl From<AgentChoice> for AgentType {
    fn from(choice: AgentChoice) -> Self {
        match choice {
            AgentChoice::Openai => AgentType::OpenAi,
            AgentChoice::Command => AgentType::Command,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

/// Default wallet owner when neither a flag nor the config names one
pub const DEFAULT_USER: &str = "local";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Start(StartArgs::default()));

    let log_format = match &command {
        Command::Start(args) => args.log_format.map(LogFormat::from).unwrap_or_default(),
        _ => LogFormat::Pretty,
    };
    let log_dir = dirs::data_dir().map(|d| d.join("interviewloop").join("logs"));
    let guard = interviewloop_logging::init_tracing(&cli.log_level, log_format, log_dir.as_deref());

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = ProjectConfig::load(&working_dir)?.unwrap_or_default();

    let code = run(command, &config).await?;

    // flush the log file before exiting
    drop(guard);
    std::process::exit(code);
}

async fn run(command: Command, config: &ProjectConfig) -> Result<i32> {
    match command {
        Command::Start(args) => return interview::run_interview(args, config).await,
        Command::Domains { questions_dir } => {
            let dir = questions_dir.or_else(|| config.questions_dir.clone());
            let bank = interview::load_bank(dir.as_deref())?;
            for domain in bank.domains() {
                println!("{}", domain.bold());
                for level in bank.levels(domain) {
                    let count = bank.pool(domain, level).map_or(0, |p| p.len());
                    println!("  {:<14} {}", level, format!("{} questions", count).dimmed());
                }
            }
        }
        Command::History {
            domain,
            level,
            limit,
            user,
            json,
        } => {
            history::handle_history(domain, level, limit, user, json)?;
        }
        Command::Show { id, json } => {
            history::handle_show(&id, json)?;
        }
        Command::Wallet { user } => {
            let user = user
                .or_else(|| config.user.clone())
                .unwrap_or_else(|| DEFAULT_USER.to_string());
            let db = Database::open().context("Failed to open database")?;
            let balance = db.wallets().balance(&user)?.unwrap_or(0);
            println!(
                "{} {} coins",
                format!("{}:", user).dimmed(),
                balance.to_string().bold()
            );
        }
        Command::Init => {
            init::handle_init().await?;
        }
    }

    Ok(0)
}
