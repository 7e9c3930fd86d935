//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Device profiles backend
#[derive(Parser)]
#[command(name = "device-profiles")]
#[command(version)]
#[command(about = "Multi-tenant device profile service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage the shared device template catalog
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user that can sign in with Basic authentication
    Add {
        username: String,

        /// Password (visible in shell history, prefer --stdin)
        #[arg(long, conflicts_with = "stdin")]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Import templates from a JSON array file
    Import {
        /// Input file path
        file_path: String,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite of an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["device-profiles"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_user_add_parsing() {
        let cli = Cli::try_parse_from([
            "device-profiles",
            "user",
            "add",
            "alice",
            "--password",
            "s3cret-pass",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::User {
                action:
                    UserCommands::Add {
                        username,
                        password,
                        stdin,
                    },
            }) => {
                assert_eq!(username, "alice");
                assert_eq!(password.as_deref(), Some("s3cret-pass"));
                assert!(!stdin);
            }
            _ => panic!("expected user add"),
        }
    }

    #[test]
    fn test_password_and_stdin_conflict() {
        let result = Cli::try_parse_from([
            "device-profiles",
            "user",
            "add",
            "alice",
            "--password",
            "x",
            "--stdin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["device-profiles", "config", "generate", "-c", "custom.toml"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }
}
