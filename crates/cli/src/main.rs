use clap::{Parser, Subcommand};

mod commands;
use commands::{
    handle_config_command, list_providers, run_lookups, ConfigCommands, LookupOptions,
};

#[derive(Parser)]
#[command(name = "beacon")]
#[command(about = "Beacon CLI - Dispatch lookups across rate-limited providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch lookups for one or more request keys
    Lookup {
        /// Request keys to look up (e.g., IP addresses)
        #[arg(required = true)]
        keys: Vec<String>,

        /// Path to config file (defaults to config/config.toml)
        #[arg(short, long, default_value = "config/config.toml")]
        config: String,

        /// Dispatch all keys concurrently instead of sequentially
        #[arg(long)]
        parallel: bool,
    },

    /// Configuration Management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List configured providers and their per-minute limits
    Providers {
        /// Path to config file (defaults to config/config.toml)
        #[arg(short, long, default_value = "config/config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup { keys, config, parallel } => {
            run_lookups(LookupOptions { keys, config_file: config, parallel }).await?;
        }

        Commands::Config(config_command) => {
            handle_config_command(config_command)?;
        }

        Commands::Providers { config } => {
            list_providers(&config)?;
        }
    }

    Ok(())
}
