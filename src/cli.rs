//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Trakerbot - affiliate link tracking API
#[derive(Parser)]
#[command(name = "trakerbot")]
#[command(version)]
#[command(about = "Affiliate link tracking API for bookmakers, UTM links and Telegram accounts", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands; none means `serve`
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create default roles and the administrator account
    Seed,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: stdout)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
