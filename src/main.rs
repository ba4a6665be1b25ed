use clap::Parser;
use tracing::error;

use trakerbot::cli::{Cli, Commands, ConfigCommands};
use trakerbot::config::StaticConfig;
use trakerbot::errors::TrakerError;
use trakerbot::runtime::modes;
use trakerbot::system::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    // 生成配置不需要读取现有配置
    if matches!(
        command,
        Commands::Config {
            action: ConfigCommands::Generate { .. }
        }
    ) {
        if let Err(e) = modes::run_cli(command, &StaticConfig::default()).await {
            eprintln!("{}", TrakerError::internal(e.to_string()).format_colored());
            std::process::exit(1);
        }
        return;
    }

    let config = match StaticConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{}",
                TrakerError::internal(format!("Failed to load configuration: {}", e)).format_colored()
            );
            std::process::exit(1);
        }
    };

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    if let Err(e) = modes::run_cli(command, &config).await {
        error!("{:#}", e);
        eprintln!("{}", TrakerError::internal(format!("{:#}", e)).format_colored());
        std::process::exit(1);
    }
}
