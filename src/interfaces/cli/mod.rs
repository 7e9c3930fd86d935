//! CLI interface module
//!
//! Management commands that run against the database directly and exit.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands, TemplateCommands, UserCommands};
use crate::config::AppConfig;
use crate::storage::StorageFactory;
use commands::{add_user, config_generate, import_templates};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::AppError> for CliError {
    fn from(err: crate::errors::AppError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

/// Run a management command parsed by clap.
///
/// `Commands::Serve` is not a management command; `main` handles it.
pub async fn run_cli_command(cmd: Commands, config: &AppConfig) -> Result<(), CliError> {
    // Generate doesn't need DB connection
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_generate(output_path, force);
    }

    let storage = StorageFactory::create(&config.database).await?;

    match cmd {
        Commands::User {
            action:
                UserCommands::Add {
                    username,
                    password,
                    stdin,
                },
        } => add_user(storage, username, password, stdin).await,
        Commands::Template {
            action: TemplateCommands::Import { file_path },
        } => import_templates(storage, file_path).await,
        Commands::Config { .. } => unreachable!("handled above"),
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a management command".to_string(),
        )),
    }
}
