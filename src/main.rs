use clap::Parser;
use tracing::error;

use device_profiles::cli::{Cli, Commands};
use device_profiles::config::{AppConfig, DEFAULT_CONFIG_PATH};
use device_profiles::interfaces::cli::run_cli_command;
use device_profiles::runtime::modes::run_server;
use device_profiles::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = AppConfig::load_from(config_path)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = init_logging(&config.logging)?;
            if let Err(e) = run_server(&config).await {
                error!("Server exited with error: {:#}", e);
                return Err(e);
            }
            Ok(())
        }
        Some(cmd) => {
            if let Err(e) = run_cli_command(cmd, &config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
