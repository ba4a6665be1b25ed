//! One-shot maintenance commands

use anyhow::{Context, Result, bail};
use colored::Colorize;
use tracing::info;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::storage::{StorageFactory, seed};

pub async fn run_cli(command: Commands, config: &StaticConfig) -> Result<()> {
    match command {
        Commands::Serve => super::run_server(config).await,
        Commands::Migrate => {
            // 建立连接时即执行迁移
            let storage = StorageFactory::create(&config.database)
                .await
                .context("Failed to run migrations")?;
            info!("Migrations applied on {} backend", storage.backend_name());
            println!("{} Database is up to date", "✓".green().bold());
            Ok(())
        }
        Commands::Seed => {
            let storage = StorageFactory::create(&config.database)
                .await
                .context("Failed to create storage backend")?;
            seed::seed_data(&storage, &config.seed)
                .await
                .context("Failed to seed initial data")?;
            println!("{} Seed data is in place", "✓".green().bold());
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => generate_config(output_path, force),
        },
    }
}

fn generate_config(output_path: Option<String>, force: bool) -> Result<()> {
    let Some(path) = output_path else {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if std::path::Path::new(&path).exists() && !force {
        bail!("{} already exists, use --force to overwrite", path);
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    println!("{} Sample configuration written to {}", "✓".green().bold(), path);
    Ok(())
}
